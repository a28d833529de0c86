use crate::{Result, RlError};
use ml::{Recorder, Tensor};
use std::collections::HashMap;

/// The REINFORCE surrogate `Σ_t −log_prob[t] · return[t]` as a `[1]` tensor.
///
/// Minimising it raises the probability of actions followed by above-average
/// returns and lowers it for the rest.
///
/// # Errors
///
/// Returns [`RlError::LengthMismatch`] if the two sequences differ in length.
pub fn policy_loss(
    log_probs: &Tensor,
    returns: &Tensor,
    recorder: &mut impl Recorder,
    tensors: &mut HashMap<usize, Tensor>,
) -> Result<Tensor> {
    if log_probs.len() != returns.len() {
        return Err(RlError::LengthMismatch { log_probs: log_probs.len(), returns: returns.len() });
    }
    Ok(log_probs
        .mul(returns, recorder, tensors)
        .reduce_sum(recorder, tensors)
        .mul_scalar(-1.0, recorder, tensors))
}
