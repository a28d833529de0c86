#![deny(clippy::all, clippy::pedantic)]
//! # REINFORCE on cart-pole
//!
//! Library half of the `reinforce` binary. The crates underneath split the
//! work as follows:
//!
//! -   `physics` integrates the cart-pole equations of motion.
//! -   [`rl`] wraps them as an episodic environment and implements the
//!     policy network, discounted returns, the policy-gradient objective and
//!     the training loop on top of the `ml` autodiff crate.
//! -   [`render`] turns the per-episode rewards into a PNG.
//!
//! [`run`] strings these together: train, report, optionally evaluate the
//! greedy policy, and save the training curve.

pub mod app;

pub use app::{run, AppConfig};
