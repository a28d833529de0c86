use crate::recorder::Recorder;

/// Operation kinds understood by the backward pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EOp {
    Mul,
    MulScalar(f32),
    MatMul,
    AddBroadcast,
    Relu,
    LogSoftmax,
    Gather,
    ReduceSum,
}

/// One recorded operation. `b` is `None` for unary ops.
#[derive(Clone, Debug)]
pub struct Node {
    pub op: EOp,
    pub a: usize,
    pub b: Option<usize>,
    pub out: usize,
}

/// A recorder that keeps the nodes for inspection but is never differentiated.
/// Use it for inference passes.
#[derive(Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Recorder for Graph {
    fn record(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
