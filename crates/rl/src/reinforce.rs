use crate::cartpole::CartPoleEnv;
use crate::env::Env;
use crate::episode::{collect_episode, Trajectory};
use crate::objective::policy_loss;
use crate::policy::PolicyNetwork;
use crate::returns::{discounted_returns, normalize};
use crate::{Result, RlError};
use ml::{Adam, Tape, Tensor};
use std::collections::HashMap;

/// Hyperparameters of a REINFORCE run.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainConfig {
    /// Episodes run by [`ReinforceTrainer::train`].
    pub episodes: usize,
    pub gamma: f32,
    pub learning_rate: f32,
    pub hidden_dim: usize,
    /// Log a progress line every this many episodes.
    pub report_every: usize,
    /// Number of trailing episodes averaged in progress lines.
    pub report_window: usize,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            gamma: 0.99,
            learning_rate: 0.01,
            hidden_dim: 32,
            report_every: 100,
            report_window: 100,
            seed: 0,
        }
    }
}

impl TrainConfig {
    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(RlError::InvalidConfig(format!("gamma {} is not in [0, 1]", self.gamma)));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(RlError::InvalidConfig(format!(
                "learning rate {} must be positive",
                self.learning_rate
            )));
        }
        if self.hidden_dim == 0 || self.report_every == 0 || self.report_window == 0 {
            return Err(RlError::InvalidConfig(
                "hidden_dim, report_every and report_window must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// The progress line due after the last episode of `history`: the
    /// rolling average of the last `report_window` totals when the episode
    /// count is a multiple of `report_every`, `None` otherwise.
    #[must_use]
    pub fn progress(&self, history: &[f32]) -> Option<f32> {
        let episode = history.len();
        (episode > 0 && episode % self.report_every == 0)
            .then(|| rolling_average(history, self.report_window))
    }
}

/// Summary of one training iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeStats {
    /// 1-based index of the episode.
    pub episode: usize,
    pub length: usize,
    pub total_reward: f32,
    /// Value of the surrogate objective before the update.
    pub loss: f32,
}

/// Mean of the last `window` entries, or of all of them if there are fewer.
/// An empty history averages to `0.0`.
#[must_use]
pub fn rolling_average(history: &[f32], window: usize) -> f32 {
    let tail = &history[history.len().saturating_sub(window)..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().sum::<f32>() / tail.len() as f32
}

/// Owns the policy, its optimiser and the random source, and runs the
/// REINFORCE loop against an environment.
///
/// Each iteration goes episode-start → stepping → episode-end →
/// parameter-update, and [`ReinforceTrainer::train`] stops once the episode
/// budget is spent. Failures are not retried.
pub struct ReinforceTrainer<E: Env> {
    env: E,
    policy: PolicyNetwork,
    optimizer: Adam,
    rng: fastrand::Rng,
    config: TrainConfig,
    history: Vec<f32>,
}

impl<E: Env> ReinforceTrainer<E> {
    /// Builds a fresh policy sized for `env`. Initial weights and action
    /// sampling both draw from a generator seeded with `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] if `config` does not validate.
    pub fn new_with(env: E, config: TrainConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let policy =
            PolicyNetwork::new(env.obs_size(), config.hidden_dim, env.action_size(), &mut rng);
        let optimizer = Adam::new(&policy.params(), config.learning_rate);
        Ok(Self { env, policy, optimizer, rng, config, history: Vec::new() })
    }

    #[must_use]
    pub fn policy(&self) -> &PolicyNetwork {
        &self.policy
    }

    #[must_use]
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Total reward of every episode trained so far.
    #[must_use]
    pub fn history(&self) -> &[f32] {
        &self.history
    }

    /// Applies one policy-gradient step for `trajectory` and returns the
    /// objective value.
    ///
    /// # Errors
    ///
    /// Propagates failures of the autodiff stack.
    pub fn update(&mut self, trajectory: &Trajectory) -> Result<f32> {
        let returns = normalize(&discounted_returns(&trajectory.rewards, self.config.gamma));
        let returns = Tensor::from_vec(vec![returns.len()], returns);

        let mut tape = Tape::new();
        let mut tensors = HashMap::new();
        let states = trajectory.states_tensor(self.policy.obs_dim());
        let log_probs =
            self.policy.log_probs(&states, &trajectory.actions, &mut tape, &mut tensors);
        let loss = policy_loss(&log_probs, &returns, &mut tape, &mut tensors)?;

        self.policy.zero_grad();
        tape.backward(&loss, &mut tensors)?;
        self.policy.load_grads(&tensors);
        self.optimizer.step(&mut self.policy.params_mut())?;

        Ok(loss.data()[0])
    }

    /// Collects one episode with the current policy and learns from it.
    ///
    /// # Errors
    ///
    /// Propagates environment and autodiff failures.
    pub fn train_episode(&mut self) -> Result<EpisodeStats> {
        let trajectory = collect_episode(&mut self.env, &self.policy, &mut self.rng)?;
        let loss = self.update(&trajectory)?;
        self.history.push(trajectory.total_reward());

        let stats = EpisodeStats {
            episode: self.history.len(),
            length: trajectory.len(),
            total_reward: trajectory.total_reward(),
            loss,
        };
        tracing::debug!(
            episode = stats.episode,
            length = stats.length,
            reward = stats.total_reward,
            loss = stats.loss,
            "episode finished"
        );
        Ok(stats)
    }

    /// Trains for `config.episodes` episodes and returns the full reward
    /// history. Every `config.report_every` episodes the rolling average of
    /// the last `config.report_window` totals is logged.
    ///
    /// # Errors
    ///
    /// Stops at the first environment or autodiff failure.
    pub fn train(&mut self) -> Result<Vec<f32>> {
        for _ in 0..self.config.episodes {
            let stats = self.train_episode()?;
            if let Some(average) = self.config.progress(&self.history) {
                tracing::info!(
                    episode = stats.episode,
                    average,
                    "Episode {}: Avg Reward = {average:.2}",
                    stats.episode
                );
            }
        }
        Ok(self.history.clone())
    }
}

impl ReinforceTrainer<CartPoleEnv> {
    /// Trainer on the standard cart-pole task. The environment's reset noise
    /// is seeded from `config.seed` as well.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] if `config` does not validate.
    pub fn cartpole(config: TrainConfig) -> Result<Self> {
        let env = CartPoleEnv::new(config.seed.wrapping_add(1));
        Self::new_with(env, config)
    }
}

/// Runs the greedy version of `policy` for `episodes` episodes and returns
/// each episode's total reward. The policy is not updated.
///
/// # Errors
///
/// Propagates environment failures.
pub fn evaluate<E: Env>(policy: &PolicyNetwork, env: &mut E, episodes: usize) -> Result<Vec<f32>> {
    let mut totals = Vec::with_capacity(episodes);
    for _ in 0..episodes {
        let (mut state, _info) = env.reset()?;
        let mut total = 0.0;
        loop {
            let step = env.step(policy.greedy_action(&state))?;
            total += step.reward;
            if step.done() {
                break;
            }
            state = step.observation;
        }
        totals.push(total);
    }
    Ok(totals)
}
