#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]
//! # ML building blocks
//!
//! A small reverse-mode automatic differentiation stack used by the policy
//! gradient code in the `rl` crate.
//!
//! -   [`Tensor`]: a dense `f32` buffer with a shape and a unique id.
//! -   [`Recorder`]: anything that can observe operations as they run. A
//!     [`Graph`] keeps them for inspection only, a [`Tape`] keeps them so that
//!     [`Tape::backward`] can replay them in reverse and compute gradients.
//! -   [`Dense`]: a fully connected layer with Glorot initialisation.
//! -   [`Adam`]: the adaptive moment optimiser.
//!
//! Operations take the recorder and a tensor store
//! (`HashMap<usize, Tensor>`) explicitly. Inputs are registered in the store
//! on first use and every output is inserted, so the store always holds what
//! the backward pass needs.

pub mod graph;
pub mod nn;
pub mod optim;
pub mod recorder;
pub mod tape;
pub mod tensor;

pub use graph::{EOp, Graph, Node};
pub use nn::Dense;
pub use optim::Adam;
pub use recorder::Recorder;
pub use tape::Tape;
pub use tensor::Tensor;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlError {
    #[error("tensor {0} is referenced by the tape but missing from the tensor store")]
    MissingTensor(usize),
    #[error("{op:?} node producing tensor {out} was recorded without a second operand")]
    MissingOperand { op: EOp, out: usize },
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

pub type Result<T> = std::result::Result<T, MlError>;
