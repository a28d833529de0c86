#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # Training curve rendering
//!
//! Rasterises a per-episode reward history into a PNG: the raw rewards as a
//! faint line, a moving average on top and a dashed reference line at the
//! score that counts as solving the task.

pub mod canvas;
pub mod plot;

pub use canvas::Canvas;
pub use plot::{moving_average, render_training_curve, save_training_curve, PlotConfig};
