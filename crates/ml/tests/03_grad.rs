use ml::nn::Dense;
use ml::tape::Tape;
use ml::*;
use std::collections::HashMap;

/// `Dense → ReLU → Dense → log_softmax → gather → Σ` as a scalar function of
/// the layers, evaluated without a tape.
fn objective(l1: &Dense, l2: &Dense, x: &Tensor, idx: &Tensor) -> f32 {
    let mut g = Graph::new();
    let mut tensors = HashMap::new();
    let h = l1.forward(x, &mut g, &mut tensors).relu(&mut g, &mut tensors);
    let logp = l2
        .forward(&h, &mut g, &mut tensors)
        .log_softmax(&mut g, &mut tensors)
        .gather(idx, &mut g, &mut tensors);
    let weights = Tensor::from_vec(vec![2], vec![0.7, -1.3]);
    logp.mul(&weights, &mut g, &mut tensors)
        .reduce_sum(&mut g, &mut tensors)
        .mul_scalar(-1.0, &mut g, &mut tensors)
        .data()[0]
}

fn analytical(l1: &Dense, l2: &Dense, x: &Tensor, idx: &Tensor) -> HashMap<usize, Tensor> {
    let mut tape = Tape::new();
    let mut tensors = HashMap::new();
    let h = l1.forward(x, &mut tape, &mut tensors).relu(&mut tape, &mut tensors);
    let logp = l2
        .forward(&h, &mut tape, &mut tensors)
        .log_softmax(&mut tape, &mut tensors)
        .gather(idx, &mut tape, &mut tensors);
    let weights = Tensor::from_vec(vec![2], vec![0.7, -1.3]);
    let loss = logp
        .mul(&weights, &mut tape, &mut tensors)
        .reduce_sum(&mut tape, &mut tensors)
        .mul_scalar(-1.0, &mut tape, &mut tensors);
    tape.backward(&loss, &mut tensors).unwrap();
    tensors
}

#[test]
fn policy_style_graph_matches_finite_differences() {
    let mut rng = fastrand::Rng::with_seed(3);
    let l1 = Dense::random(3, 5, &mut rng);
    let mut l2 = Dense::random(5, 2, &mut rng);
    l2.b.data = vec![0.1, -0.2];
    let x = Tensor::from_vec(vec![2, 3], vec![0.9, -0.1, 0.3, -0.4, 0.8, 0.05]);
    let idx = Tensor::from_vec(vec![2], vec![1.0, 0.0]);

    let tensors = analytical(&l1, &l2, &x, &idx);
    let eps = 1e-3;

    let params: Vec<(&str, usize)> =
        vec![("l1.w", l1.w.id), ("l1.b", l1.b.id), ("l2.w", l2.w.id), ("l2.b", l2.b.id)];
    for (name, id) in params {
        let grad = tensors[&id].grad.clone().expect("parameter gradient");
        for i in 0..grad.len() {
            let perturb = |delta: f32| {
                let (mut a, mut b) = (l1.clone(), l2.clone());
                match name {
                    "l1.w" => a.w.data[i] += delta,
                    "l1.b" => a.b.data[i] += delta,
                    "l2.w" => b.w.data[i] += delta,
                    _ => b.b.data[i] += delta,
                }
                objective(&a, &b, &x, &idx)
            };
            let numerical = (perturb(eps) - perturb(-eps)) / (2.0 * eps);
            let diff = (numerical - grad[i]).abs();
            assert!(
                diff < 2e-2,
                "grad check failed for {name}[{i}]. Numerical: {numerical}, Analytical: {}",
                grad[i]
            );
        }
    }
}

#[test]
fn relu_backward() {
    let mut tensors = HashMap::new();
    let mut x = Tensor::from_vec(vec![3], vec![-1.0, 0.0, 2.0]);
    x.set_requires_grad();
    let mut tape = Tape::new();
    let y = x.relu(&mut tape, &mut tensors);
    let loss = y.reduce_sum(&mut tape, &mut tensors);
    tape.backward(&loss, &mut tensors).unwrap();
    let grad = tensors[&x.id].grad.clone().unwrap();
    assert_eq!(grad, vec![0.0, 0.0, 1.0]);
}

#[test]
fn tensors_without_requires_grad_get_no_gradient() {
    let mut tensors = HashMap::new();
    let x = Tensor::from_vec(vec![2], vec![1.0, 2.0]);
    let mut tape = Tape::new();
    let loss = x.reduce_sum(&mut tape, &mut tensors);
    tape.backward(&loss, &mut tensors).unwrap();
    assert!(tensors[&x.id].grad.is_none());
}

#[test]
fn backward_with_foreign_store_fails() {
    let mut tensors = HashMap::new();
    let x = Tensor::from_vec(vec![2], vec![1.0, 2.0]).with_grad();
    let mut tape = Tape::new();
    let loss = x.reduce_sum(&mut tape, &mut tensors);
    let mut other = HashMap::new();
    other.insert(loss.id, loss.clone());
    let err = tape.backward(&loss, &mut other).unwrap_err();
    assert!(matches!(err, MlError::MissingTensor(id) if id == x.id));
}

#[test]
fn binary_node_without_second_operand_is_reported() {
    let mut tensors = HashMap::new();
    let x = Tensor::from_vec(vec![2], vec![1.0, 2.0]).with_grad();
    let mut tape = Tape::new();
    let y = x.mul_scalar(2.0, &mut tape, &mut tensors);
    tape.record(Node { op: EOp::Mul, a: x.id, b: None, out: y.id });
    let err = tape.backward(&y, &mut tensors).unwrap_err();
    assert!(matches!(err, MlError::MissingOperand { op: EOp::Mul, out } if out == y.id));
}
