use crate::graph::{EOp, Node};
use crate::recorder::Recorder;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A dense, row-major `f32` tensor.
///
/// Clones share the id of the original, which is how a parameter stored in a
/// model and its copy in a tensor store refer to the same tape slot.
#[derive(Clone, Debug)]
pub struct Tensor {
    pub id: usize,
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
    pub requires_grad: bool,
    pub grad: Option<Vec<f32>>,
}

impl Tensor {
    /// # Panics
    ///
    /// Panics if `data.len()` is not the product of `shape`.
    #[must_use]
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>) -> Self {
        assert_eq!(
            shape.iter().product::<usize>(),
            data.len(),
            "shape {shape:?} does not match {} elements",
            data.len()
        );
        Self { id: next_id(), data, shape, requires_grad: false, grad: None }
    }

    #[must_use]
    pub fn with_grad(mut self) -> Self {
        self.requires_grad = true;
        self
    }

    pub fn set_requires_grad(&mut self) {
        self.requires_grad = true;
    }

    pub fn zero_grad(&mut self) {
        self.grad = None;
    }

    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Views the tensor as a matrix whose rows run along the last dimension.
    #[must_use]
    pub fn rows_cols(&self) -> (usize, usize) {
        let cols = self.shape.last().copied().unwrap_or(1).max(1);
        (self.len() / cols, cols)
    }

    fn emit(
        &self,
        op: EOp,
        other: Option<&Tensor>,
        out: Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        tensors.entry(self.id).or_insert_with(|| self.clone());
        if let Some(b) = other {
            tensors.entry(b.id).or_insert_with(|| b.clone());
        }
        tensors.insert(out.id, out.clone());
        recorder.record(Node { op, a: self.id, b: other.map(|b| b.id), out: out.id });
        out
    }

    /// Element-wise product.
    ///
    /// # Panics
    ///
    /// Panics if the two tensors have different lengths.
    pub fn mul(
        &self,
        other: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        assert_eq!(self.len(), other.len(), "mul: length mismatch");
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a * b).collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        self.emit(EOp::Mul, Some(other), out, recorder, tensors)
    }

    pub fn mul_scalar(
        &self,
        scalar: f32,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let data = self.data.iter().map(|a| a * scalar).collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        self.emit(EOp::MulScalar(scalar), None, out, recorder, tensors)
    }

    /// `self` is a `[out, in]` weight matrix, `x` is either a single `[in]`
    /// vector or a `[batch, in]` matrix. The result is `[out]` or
    /// `[batch, out]` respectively.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not two-dimensional or the inner dimensions differ.
    pub fn matmul(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        assert_eq!(self.shape.len(), 2, "matmul: weight must be [out, in]");
        let (out_dim, in_dim) = (self.shape[0], self.shape[1]);
        assert_eq!(
            x.shape.last().copied(),
            Some(in_dim),
            "matmul: input {:?} does not end in {in_dim}",
            x.shape
        );
        let batch = x.len() / in_dim;
        let mut data = vec![0.0; batch * out_dim];
        for k in 0..batch {
            let row = &x.data[k * in_dim..(k + 1) * in_dim];
            for o in 0..out_dim {
                let w = &self.data[o * in_dim..(o + 1) * in_dim];
                data[k * out_dim + o] = w.iter().zip(row).map(|(w, v)| w * v).sum();
            }
        }
        let shape = if x.shape.len() == 1 { vec![out_dim] } else { vec![batch, out_dim] };
        let out = Tensor::from_vec(shape, data);
        self.emit(EOp::MatMul, Some(x), out, recorder, tensors)
    }

    /// Adds the vector `bias` to every row of `self`.
    ///
    /// # Panics
    ///
    /// Panics if the last dimension of `self` differs from the bias length.
    pub fn add_broadcast(
        &self,
        bias: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let (_, cols) = self.rows_cols();
        assert_eq!(cols, bias.len(), "add_broadcast: bias length mismatch");
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, v)| v + bias.data[i % cols])
            .collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        self.emit(EOp::AddBroadcast, Some(bias), out, recorder, tensors)
    }

    pub fn relu(
        &self,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let data = self.data.iter().map(|v| v.max(0.0)).collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        self.emit(EOp::Relu, None, out, recorder, tensors)
    }

    /// Row-wise `log(softmax(x))`, computed with the max-shift for stability.
    pub fn log_softmax(
        &self,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let (_, cols) = self.rows_cols();
        let mut data = Vec::with_capacity(self.len());
        for row in self.data.chunks(cols) {
            let m = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let log_sum = row.iter().map(|v| (v - m).exp()).sum::<f32>().ln();
            data.extend(row.iter().map(|v| v - m - log_sum));
        }
        let out = Tensor::from_vec(self.shape.clone(), data);
        self.emit(EOp::LogSoftmax, None, out, recorder, tensors)
    }

    /// Picks one column per row: `out[r] = self[r, index[r]]`. Indices are
    /// stored as `f32` so they can live in the tensor store.
    ///
    /// # Panics
    ///
    /// Panics if `index` has a different number of rows or an index is out
    /// of range.
    pub fn gather(
        &self,
        index: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let (rows, cols) = self.rows_cols();
        assert_eq!(rows, index.len(), "gather: one index per row expected");
        let data = index
            .data
            .iter()
            .enumerate()
            .map(|(r, &i)| {
                let col = gather_column(i, cols);
                self.data[r * cols + col]
            })
            .collect();
        let out = Tensor::from_vec(vec![rows], data);
        self.emit(EOp::Gather, Some(index), out, recorder, tensors)
    }

    pub fn reduce_sum(
        &self,
        recorder: &mut impl Recorder,
        tensors: &mut HashMap<usize, Tensor>,
    ) -> Tensor {
        let out = Tensor::from_vec(vec![1], vec![self.data.iter().sum()]);
        self.emit(EOp::ReduceSum, None, out, recorder, tensors)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn gather_column(index: f32, cols: usize) -> usize {
    let col = index as usize;
    assert!(index >= 0.0 && col < cols, "gather: index {index} out of range for {cols} columns");
    col
}
