use crate::recorder::Recorder;
use crate::tensor::Tensor;
use std::collections::HashMap;

/// A fully connected neural network layer.
#[derive(Clone, Debug)]
pub struct Dense {
    /// The `[out, in]` weight matrix.
    pub w: Tensor,
    /// The `[out]` bias vector.
    pub b: Tensor,
    pub in_dim: usize,
    pub out_dim: usize,
}

impl Dense {
    /// Creates a new `Dense` layer with the given weights and biases.
    ///
    /// # Panics
    ///
    /// Panics if the buffers do not match the dimensions.
    #[must_use]
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_d: usize, out_d: usize) -> Self {
        assert_eq!(weights.len(), in_d * out_d);
        assert_eq!(bias.len(), out_d);
        Self {
            w: Tensor::from_vec(vec![out_d, in_d], weights).with_grad(),
            b: Tensor::from_vec(vec![out_d], bias).with_grad(),
            in_dim: in_d,
            out_dim: out_d,
        }
    }

    /// Glorot uniform weights, zero biases.
    #[must_use]
    pub fn random(in_d: usize, out_d: usize, rng: &mut fastrand::Rng) -> Self {
        let limit = (6.0 / (in_d + out_d) as f32).sqrt();
        let weights = (0..in_d * out_d)
            .map(|_| rng.f32() * 2.0 * limit - limit)
            .collect();
        Self::new(weights, vec![0.0; out_d], in_d, out_d)
    }

    /// `x` may be a single `[in]` vector or a `[batch, in]` matrix.
    pub fn forward(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let wx = self.w.matmul(x, recorder, tensors);
        wx.add_broadcast(&self.b, recorder, tensors)
    }

    #[must_use]
    pub fn params(&self) -> Vec<&Tensor> {
        vec![&self.w, &self.b]
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.w, &mut self.b]
    }
}
