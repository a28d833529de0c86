use crate::{Result, RlError};
use ml::{Dense, Graph, Recorder, Tensor};
use std::collections::HashMap;

/// Stochastic policy over a discrete action set.
///
/// `Dense(obs → hidden) → ReLU → Dense(hidden → actions)` produces logits;
/// a softmax turns them into action probabilities.
#[derive(Clone, Debug)]
pub struct PolicyNetwork {
    pub l1: Dense,
    pub head: Dense,
}

impl PolicyNetwork {
    #[must_use]
    pub fn new(
        obs_dim: usize,
        hidden_dim: usize,
        n_actions: usize,
        rng: &mut fastrand::Rng,
    ) -> Self {
        Self {
            l1: Dense::random(obs_dim, hidden_dim, rng),
            head: Dense::random(hidden_dim, n_actions, rng),
        }
    }

    #[must_use]
    pub fn obs_dim(&self) -> usize {
        self.l1.in_dim
    }

    #[must_use]
    pub fn n_actions(&self) -> usize {
        self.head.out_dim
    }

    /// Raw action scores for a `[obs]` state or a `[batch, obs]` matrix.
    pub fn forward(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let h = self.l1.forward(x, recorder, tensors).relu(recorder, tensors);
        self.head.forward(&h, recorder, tensors)
    }

    /// Action probabilities for a single state.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not have [`PolicyNetwork::obs_dim`] features.
    #[must_use]
    pub fn probabilities(&self, state: &[f32]) -> Vec<f32> {
        assert_eq!(state.len(), self.obs_dim(), "state has the wrong number of features");
        let mut g = Graph::new();
        let mut tensors = HashMap::new();
        let x = Tensor::from_vec(vec![state.len()], state.to_vec());
        self.forward(&x, &mut g, &mut tensors)
            .log_softmax(&mut g, &mut tensors)
            .data()
            .iter()
            .map(|l| l.exp())
            .collect()
    }

    /// Samples an action from the policy's distribution and returns it with
    /// its log-probability.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::InvalidDistribution`] if the network produced
    /// probabilities that cannot be sampled, e.g. after its weights diverged.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not have [`PolicyNetwork::obs_dim`] features.
    pub fn select_action(&self, state: &[f32], rng: &mut fastrand::Rng) -> Result<(usize, f32)> {
        let probs = self.probabilities(state);
        let action = sample_categorical(&probs, rng)?;
        Ok((action, probs[action].ln()))
    }

    /// The most likely action. Only meant for evaluating a trained policy.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not have [`PolicyNetwork::obs_dim`] features.
    #[must_use]
    pub fn greedy_action(&self, state: &[f32]) -> usize {
        self.probabilities(state)
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map_or(0, |(i, _)| i)
    }

    /// `log π(actions[t] | states[t])` for a `[T, obs]` batch, recorded on
    /// `recorder` so the result can be differentiated.
    ///
    /// # Panics
    ///
    /// Panics if `actions` does not have one entry per state row.
    pub fn log_probs(
        &self,
        states: &Tensor,
        actions: &[usize],
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let index = Tensor::from_vec(
            vec![actions.len()],
            actions.iter().map(|&a| a as f32).collect(),
        );
        self.forward(states, recorder, tensors)
            .log_softmax(recorder, tensors)
            .gather(&index, recorder, tensors)
    }

    #[must_use]
    pub fn params(&self) -> Vec<&Tensor> {
        let mut params = self.l1.params();
        params.extend(self.head.params());
        params
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.l1.params_mut();
        params.extend(self.head.params_mut());
        params
    }

    pub fn zero_grad(&mut self) {
        for p in self.params_mut() {
            p.zero_grad();
        }
    }

    /// Copies the gradients computed on a tape's tensor store into the
    /// parameters.
    pub fn load_grads(&mut self, tensors: &HashMap<usize, Tensor>) {
        for p in self.params_mut() {
            p.grad = tensors.get(&p.id).and_then(|t| t.grad.clone());
        }
    }
}

/// Draws an index with probability proportional to `probs[i]`.
///
/// Rounding can leave the cumulative sum just under the uniform draw; the
/// last index absorbs that remainder.
///
/// # Errors
///
/// Returns [`RlError::InvalidDistribution`] if any entry is negative or not
/// finite, or if the entries do not sum to a positive value.
pub fn sample_categorical(probs: &[f32], rng: &mut fastrand::Rng) -> Result<usize> {
    let total: f32 = probs.iter().sum();
    if probs.iter().any(|p| !p.is_finite() || *p < 0.0) || !(total > 0.0 && total.is_finite()) {
        return Err(RlError::InvalidDistribution(probs.to_vec()));
    }
    let u = rng.f32() * total;
    let mut cumulative = 0.0;
    for (i, p) in probs.iter().enumerate() {
        cumulative += p;
        if u < cumulative {
            return Ok(i);
        }
    }
    Ok(probs.len() - 1)
}
