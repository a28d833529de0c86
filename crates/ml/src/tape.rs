use crate::graph::{EOp, Node};
use crate::recorder::Recorder;
use crate::tensor::gather_column;
use crate::{MlError, Result, Tensor};
use std::collections::HashMap;

/// A tape that records operations for automatic differentiation.
#[derive(Default)]
pub struct Tape {
    nodes: Vec<Node>,
}

impl Recorder for Tape {
    fn record(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

fn fetch(tensors: &HashMap<usize, Tensor>, id: usize) -> Result<&Tensor> {
    tensors.get(&id).ok_or(MlError::MissingTensor(id))
}

fn slot(grads: &mut HashMap<usize, Vec<f32>>, id: usize, len: usize) -> &mut Vec<f32> {
    grads.entry(id).or_insert_with(|| vec![0.0; len])
}

impl Tape {
    /// Creates a new, empty tape.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the gradients of every recorded tensor with respect to `loss`.
    ///
    /// The recorded operations are replayed in reverse order. Tensors in the
    /// store with `requires_grad` set receive their gradient in `grad`;
    /// everything else is discarded once the pass is done. Nodes that do not
    /// lead to the loss are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::MissingTensor`] if a recorded operand is not in the
    /// store, which happens when a store from a different pass is supplied,
    /// and [`MlError::MissingOperand`] for a binary node recorded without its
    /// second input.
    pub fn backward(&self, loss: &Tensor, tensors: &mut HashMap<usize, Tensor>) -> Result<()> {
        fetch(tensors, loss.id)?;
        let mut grads: HashMap<usize, Vec<f32>> = HashMap::new();
        grads.insert(loss.id, vec![1.0; loss.len()]);

        for node in self.nodes.iter().rev() {
            let Some(out_grad) = grads.get(&node.out).cloned() else {
                continue;
            };
            let a = fetch(tensors, node.a)?;
            let b = match node.b {
                Some(id) => Some(fetch(tensors, id)?),
                None => None,
            };
            let b = || b.ok_or(MlError::MissingOperand { op: node.op, out: node.out });

            match node.op {
                EOp::Mul => {
                    let b = b()?;
                    let ga = slot(&mut grads, a.id, a.len());
                    for (g, (d, og)) in ga.iter_mut().zip(b.data.iter().zip(&out_grad)) {
                        *g += d * og;
                    }
                    let gb = slot(&mut grads, b.id, b.len());
                    for (g, (d, og)) in gb.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        *g += d * og;
                    }
                }
                EOp::MulScalar(scalar) => {
                    let ga = slot(&mut grads, a.id, a.len());
                    for (g, og) in ga.iter_mut().zip(&out_grad) {
                        *g += scalar * og;
                    }
                }
                EOp::MatMul => {
                    let x = b()?;
                    let (out_dim, in_dim) = (a.shape[0], a.shape[1]);
                    let batch = x.len() / in_dim;
                    {
                        let gw = slot(&mut grads, a.id, a.len());
                        for k in 0..batch {
                            for o in 0..out_dim {
                                let og = out_grad[k * out_dim + o];
                                for i in 0..in_dim {
                                    gw[o * in_dim + i] += og * x.data[k * in_dim + i];
                                }
                            }
                        }
                    }
                    let gx = slot(&mut grads, x.id, x.len());
                    for k in 0..batch {
                        for o in 0..out_dim {
                            let og = out_grad[k * out_dim + o];
                            for i in 0..in_dim {
                                gx[k * in_dim + i] += og * a.data[o * in_dim + i];
                            }
                        }
                    }
                }
                EOp::AddBroadcast => {
                    let bias = b()?;
                    let cols = bias.len();
                    let ga = slot(&mut grads, a.id, a.len());
                    for (g, og) in ga.iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                    let gb = slot(&mut grads, bias.id, cols);
                    for (i, og) in out_grad.iter().enumerate() {
                        gb[i % cols] += og;
                    }
                }
                EOp::Relu => {
                    let ga = slot(&mut grads, a.id, a.len());
                    for (g, (d, og)) in ga.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        if *d > 0.0 {
                            *g += og;
                        }
                    }
                }
                EOp::LogSoftmax => {
                    let out = fetch(tensors, node.out)?;
                    let (_, cols) = a.rows_cols();
                    let ga = slot(&mut grads, a.id, a.len());
                    for ((g, y), og) in ga
                        .chunks_mut(cols)
                        .zip(out.data.chunks(cols))
                        .zip(out_grad.chunks(cols))
                    {
                        let total: f32 = og.iter().sum();
                        for (g, (y, og)) in g.iter_mut().zip(y.iter().zip(og)) {
                            *g += og - y.exp() * total;
                        }
                    }
                }
                EOp::Gather => {
                    let index = b()?;
                    let (_, cols) = a.rows_cols();
                    let ga = slot(&mut grads, a.id, a.len());
                    for (r, (&i, og)) in index.data.iter().zip(&out_grad).enumerate() {
                        ga[r * cols + gather_column(i, cols)] += og;
                    }
                }
                EOp::ReduceSum => {
                    let ga = slot(&mut grads, a.id, a.len());
                    for g in ga.iter_mut() {
                        *g += out_grad[0];
                    }
                }
            }
        }

        for (id, grad) in grads {
            if let Some(tensor) = tensors.get_mut(&id) {
                if tensor.requires_grad {
                    tensor.grad = Some(grad);
                }
            }
        }

        Ok(())
    }
}
