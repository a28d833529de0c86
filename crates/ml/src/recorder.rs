use crate::graph::Node;

/// Observer of tensor operations.
///
/// Every op on [`crate::Tensor`] reports the node it produced here. What the
/// recorder does with it decides whether the computation can later be
/// differentiated.
pub trait Recorder {
    fn record(&mut self, node: Node);
    fn nodes(&self) -> &[Node];
}
