use crate::env::{Env, Info, Step};
use crate::{Result, RlError};
use physics::{CartPole, CartPoleConfig, Push};

/// Episodes are truncated after this many steps.
pub const MAX_EPISODE_STEPS: usize = 500;

/// The cart-pole balancing task with a time limit.
///
/// Observations are `[x, x_dot, theta, theta_dot]`, action `0` pushes the
/// cart left and `1` pushes it right. Every step, including the failing one,
/// earns a reward of `1.0`, so an episode's total reward is its length.
pub struct CartPoleEnv {
    pole: CartPole,
    rng: fastrand::Rng,
    max_episode_steps: usize,
    elapsed: Option<usize>,
}

impl CartPoleEnv {
    /// Default physics and the standard 500 step limit.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(CartPoleConfig::default(), MAX_EPISODE_STEPS, seed)
    }

    #[must_use]
    pub fn with_config(config: CartPoleConfig, max_episode_steps: usize, seed: u64) -> Self {
        Self {
            pole: CartPole::new(config),
            rng: fastrand::Rng::with_seed(seed),
            max_episode_steps,
            elapsed: None,
        }
    }

    #[must_use]
    pub fn max_episode_steps(&self) -> usize {
        self.max_episode_steps
    }
}

impl Env for CartPoleEnv {
    fn reset(&mut self) -> Result<(Vec<f32>, Info)> {
        let state = self.pole.reset(&mut self.rng);
        self.elapsed = Some(0);
        Ok((state.to_array().to_vec(), Info::default()))
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        let elapsed = self.elapsed.ok_or(RlError::ResetNeeded)?;
        let push = Push::from_index(action)
            .ok_or(RlError::InvalidAction { action, size: self.action_size() })?;

        let transition = self.pole.step(push);
        let elapsed = elapsed + 1;
        self.elapsed = Some(elapsed);

        Ok(Step {
            observation: transition.state.to_array().to_vec(),
            reward: transition.reward,
            terminated: transition.terminated,
            truncated: elapsed >= self.max_episode_steps,
            info: Info { elapsed_steps: elapsed },
        })
    }

    fn obs_size(&self) -> usize {
        4
    }

    fn action_size(&self) -> usize {
        2
    }
}
