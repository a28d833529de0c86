use crate::{MlError, Result, Tensor};

/// Adam with bias-corrected first and second moment estimates.
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: u32,
    m: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

impl Adam {
    /// Moment buffers are sized from `params`; later calls to [`Adam::step`]
    /// must pass the same parameters in the same order.
    #[must_use]
    pub fn new(params: &[&Tensor], lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: params.iter().map(|p| vec![0.0; p.len()]).collect(),
            v: params.iter().map(|p| vec![0.0; p.len()]).collect(),
        }
    }

    /// Number of updates applied so far.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.t
    }

    /// Applies one update using each parameter's `grad`. Parameters without a
    /// gradient are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::ShapeMismatch`] if `params` does not line up with the
    /// parameters the optimiser was built for.
    #[allow(clippy::cast_possible_wrap)]
    pub fn step(&mut self, params: &mut [&mut Tensor]) -> Result<()> {
        if params.len() != self.m.len() {
            return Err(MlError::ShapeMismatch(format!(
                "optimiser tracks {} parameters, got {}",
                self.m.len(),
                params.len()
            )));
        }
        if let Some((i, p)) = params.iter().enumerate().find(|(i, p)| p.len() != self.m[*i].len()) {
            return Err(MlError::ShapeMismatch(format!(
                "parameter {i} has {} elements, expected {}",
                p.len(),
                self.m[i].len()
            )));
        }

        self.t += 1;
        let bias1 = 1.0 - self.beta1.powi(self.t as i32);
        let bias2 = 1.0 - self.beta2.powi(self.t as i32);

        for (i, ((p, m), v)) in params.iter_mut().zip(&mut self.m).zip(&mut self.v).enumerate() {
            let Some(grad) = p.grad.as_ref() else {
                tracing::trace!(param = i, "no gradient, skipping");
                continue;
            };
            let grad = grad.clone();
            for (j, g) in grad.iter().enumerate() {
                m[j] = self.beta1 * m[j] + (1.0 - self.beta1) * g;
                v[j] = self.beta2 * v[j] + (1.0 - self.beta2) * g * g;
                let m_hat = m[j] / bias1;
                let v_hat = v[j] / bias2;
                p.data[j] -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
            }
        }
        Ok(())
    }
}
