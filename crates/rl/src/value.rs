use ml::{Dense, Graph, Recorder, Tensor};
use std::collections::HashMap;

/// State-value estimator with the same hidden structure as
/// [`crate::PolicyNetwork`] and a single linear output.
///
/// Not used by [`crate::ReinforceTrainer`]; subtracting its estimate from the
/// returns would turn the update into REINFORCE with a baseline.
#[derive(Clone, Debug)]
pub struct ValueNetwork {
    pub l1: Dense,
    pub head: Dense,
}

impl ValueNetwork {
    #[must_use]
    pub fn new(obs_dim: usize, hidden_dim: usize, rng: &mut fastrand::Rng) -> Self {
        Self {
            l1: Dense::random(obs_dim, hidden_dim, rng),
            head: Dense::random(hidden_dim, 1, rng),
        }
    }

    /// `[obs]` → `[1]`, `[batch, obs]` → `[batch, 1]`.
    pub fn forward(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let h = self.l1.forward(x, recorder, tensors).relu(recorder, tensors);
        self.head.forward(&h, recorder, tensors)
    }

    /// # Panics
    ///
    /// Panics if `state` does not match the input width.
    #[must_use]
    pub fn value(&self, state: &[f32]) -> f32 {
        let x = Tensor::from_vec(vec![state.len()], state.to_vec());
        self.forward(&x, &mut Graph::new(), &mut HashMap::new()).data()[0]
    }

    /// One estimate per row of a `[batch, obs]` matrix.
    #[must_use]
    pub fn values(&self, states: &Tensor) -> Vec<f32> {
        self.forward(states, &mut Graph::new(), &mut HashMap::new()).data
    }

    #[must_use]
    pub fn params(&self) -> Vec<&Tensor> {
        let mut params = self.l1.params();
        params.extend(self.head.params());
        params
    }
}
