#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # REINFORCE
//!
//! Monte-Carlo policy gradient on top of the `ml` autodiff stack.
//!
//! One training iteration is:
//!
//! 1.  [`collect_episode`] runs the [`PolicyNetwork`] through an [`Env`]
//!     until it terminates or is truncated, recording a [`Trajectory`].
//! 2.  [`discounted_returns`] turns the rewards into returns, which
//!     [`normalize`] rescales to zero mean and unit variance.
//! 3.  [`policy_loss`] builds `Σ −log π(a_t|s_t) · G_t` on a tape.
//! 4.  The tape is differentiated and [`ml::Adam`] updates the policy.
//!
//! [`ReinforceTrainer`] strings these together for a fixed episode budget
//! and keeps the per-episode reward history. [`ValueNetwork`] is provided as
//! a baseline extension point and is not used by the trainer.

pub mod cartpole;
pub mod env;
pub mod episode;
pub mod objective;
pub mod policy;
pub mod reinforce;
pub mod returns;
pub mod value;

pub use cartpole::{CartPoleEnv, MAX_EPISODE_STEPS};
pub use env::{Env, Info, Step};
pub use episode::{collect_episode, Trajectory};
pub use objective::policy_loss;
pub use policy::{sample_categorical, PolicyNetwork};
pub use reinforce::{evaluate, rolling_average, EpisodeStats, ReinforceTrainer, TrainConfig};
pub use returns::{discounted_returns, normalize};
pub use value::ValueNetwork;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RlError {
    #[error("{log_probs} log-probabilities but {returns} returns")]
    LengthMismatch { log_probs: usize, returns: usize },
    #[error("action {action} is outside the action space of size {size}")]
    InvalidAction { action: usize, size: usize },
    #[error("cannot sample from action probabilities {0:?}")]
    InvalidDistribution(Vec<f32>),
    #[error("cannot step an environment before it has been reset")]
    ResetNeeded,
    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Ml(#[from] ml::MlError),
}

pub type Result<T> = std::result::Result<T, RlError>;
