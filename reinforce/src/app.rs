//! Orchestration of a full training run.

use anyhow::{Context, Result};
use render::{save_training_curve, PlotConfig};
use rl::{evaluate, rolling_average, CartPoleEnv, ReinforceTrainer, TrainConfig};
use std::path::PathBuf;

/// Everything a run needs beyond the defaults of its parts.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub train: TrainConfig,
    pub plot: PlotConfig,
    /// Where the training curve is written.
    pub output: PathBuf,
    /// Greedy evaluation episodes run after training; `0` skips evaluation.
    pub eval_episodes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            train: TrainConfig::default(),
            plot: PlotConfig::default(),
            output: PathBuf::from("training_curve.png"),
            eval_episodes: 0,
        }
    }
}

/// Trains a policy on cart-pole, logs progress and writes the reward curve to
/// `config.output`. Returns the total reward of every training episode.
///
/// # Errors
///
/// Fails on an invalid training configuration, on any environment or
/// autodiff error during training, and if the plot cannot be written.
pub fn run(config: &AppConfig) -> Result<Vec<f32>> {
    tracing::info!(
        episodes = config.train.episodes,
        gamma = config.train.gamma,
        learning_rate = config.train.learning_rate,
        seed = config.train.seed,
        "Training REINFORCE on CartPole-v1..."
    );

    let mut trainer =
        ReinforceTrainer::cartpole(config.train.clone()).context("invalid training configuration")?;
    let rewards = trainer.train().context("training failed")?;

    let window = config.train.report_window;
    tracing::info!(
        "Final average reward over the last {window} episodes: {:.2}",
        rolling_average(&rewards, window)
    );

    if config.eval_episodes > 0 {
        let mut env = CartPoleEnv::new(config.train.seed.wrapping_add(2));
        let totals = evaluate(trainer.policy(), &mut env, config.eval_episodes)
            .context("evaluation failed")?;
        tracing::info!(
            "Greedy policy: average reward {:.2} over {} episodes",
            rolling_average(&totals, totals.len()),
            totals.len()
        );
    }

    save_training_curve(&config.output, &rewards, &config.plot)?;
    tracing::info!("Saved training curve to {}", config.output.display());

    Ok(rewards)
}
