#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # CartPole physics
//!
//! Classic cart-pole dynamics: a pole hinged on a cart that moves along a
//! frictionless track. The agent pushes the cart left or right with a fixed
//! force and must keep the pole upright and the cart on the track.
//!
//! The equations of motion and constants follow the standard control
//! benchmark (Barto, Sutton & Anderson, 1983) as used by `CartPole-v1`:
//!
//! -   [`CartPoleConfig`] holds the physical constants and failure limits.
//! -   [`CartPoleState`] is the 4-feature observation
//!     `[x, x_dot, theta, theta_dot]`.
//! -   [`CartPole`] integrates the dynamics one fixed time step per push.
//!
//! This crate knows nothing about episodes or time limits; the `rl` crate
//! wraps it into an environment.
//!
//! ```rust
//! use physics::{CartPole, CartPoleConfig, Push};
//!
//! let mut pole = CartPole::new(CartPoleConfig::default());
//! let mut rng = fastrand::Rng::with_seed(0);
//! pole.reset(&mut rng);
//! let transition = pole.step(Push::Right);
//! assert_eq!(transition.reward, 1.0);
//! ```

pub mod cartpole;

pub use cartpole::{CartPole, CartPoleConfig, CartPoleState, Integrator, Push, Transition};
