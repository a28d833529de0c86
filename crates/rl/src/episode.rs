use crate::env::Env;
use crate::policy::PolicyNetwork;
use crate::Result;
use ml::Tensor;

/// One episode as seen by the learner. `states[t]` is the observation the
/// policy acted on at step `t`, `rewards[t]` what the environment returned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    pub states: Vec<Vec<f32>>,
    pub actions: Vec<usize>,
    pub log_probs: Vec<f32>,
    pub rewards: Vec<f32>,
}

impl Trajectory {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    #[must_use]
    pub fn total_reward(&self) -> f32 {
        self.rewards.iter().sum()
    }

    /// The visited states stacked into a `[T, obs_dim]` matrix.
    #[must_use]
    pub fn states_tensor(&self, obs_dim: usize) -> Tensor {
        Tensor::from_vec(vec![self.len(), obs_dim], self.states.concat())
    }
}

/// Runs `policy` in `env` from a fresh reset until the episode terminates or
/// is truncated.
///
/// # Errors
///
/// Propagates any environment failure, and [`crate::RlError::InvalidDistribution`]
/// if the policy's probabilities cannot be sampled.
pub fn collect_episode<E: Env>(
    env: &mut E,
    policy: &PolicyNetwork,
    rng: &mut fastrand::Rng,
) -> Result<Trajectory> {
    let mut trajectory = Trajectory::default();
    let (mut state, _info) = env.reset()?;
    loop {
        let (action, log_prob) = policy.select_action(&state, rng)?;
        let step = env.step(action)?;
        let done = step.done();
        trajectory.states.push(state);
        trajectory.actions.push(action);
        trajectory.log_probs.push(log_prob);
        trajectory.rewards.push(step.reward);
        if done {
            return Ok(trajectory);
        }
        state = step.observation;
    }
}
