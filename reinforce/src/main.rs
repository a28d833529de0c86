//! # REINFORCE runner
//!
//! Trains a policy on cart-pole with the defaults below and saves the learning
//! curve next to the working directory. Every flag is optional.

use anyhow::Result;
use clap::Parser;
use reinforce::{run, AppConfig};
use render::PlotConfig;
use rl::TrainConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of training episodes.
    #[arg(long, default_value_t = 1000)]
    episodes: usize,
    /// Discount factor in [0, 1].
    #[arg(long, default_value_t = 0.99)]
    gamma: f32,
    /// Adam learning rate.
    #[arg(long, default_value_t = 0.01)]
    lr: f32,
    /// Width of the policy's hidden layer.
    #[arg(long, default_value_t = 32)]
    hidden: usize,
    /// Seed for weights, sampling and the environment. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Greedy evaluation episodes to run after training.
    #[arg(long, default_value_t = 10)]
    eval_episodes: usize,
    /// Episodes per moving-average window in the plot.
    #[arg(long, default_value_t = 50)]
    window: usize,
    /// Output path of the training curve.
    #[arg(long, default_value = "training_curve.png")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| fastrand::u64(..));
    if args.seed.is_none() {
        tracing::info!(seed, "no seed given, drew one");
    }

    let config = AppConfig {
        train: TrainConfig {
            episodes: args.episodes,
            gamma: args.gamma,
            learning_rate: args.lr,
            hidden_dim: args.hidden,
            seed,
            ..TrainConfig::default()
        },
        plot: PlotConfig { window: args.window, ..PlotConfig::default() },
        output: args.output,
        eval_episodes: args.eval_episodes,
    };
    run(&config)?;
    Ok(())
}
