use ml::{Graph, Tape, Tensor};
use rl::{policy_loss, RlError};
use std::collections::HashMap;

#[test]
fn loss_is_negative_weighted_log_likelihood() {
    let mut tensors = HashMap::new();
    let log_probs = Tensor::from_vec(vec![2], vec![-1.0, -2.0]);
    let returns = Tensor::from_vec(vec![2], vec![1.0, 1.0]);
    let loss = policy_loss(&log_probs, &returns, &mut Graph::new(), &mut tensors).unwrap();
    assert_eq!(loss.data(), &[3.0]);
}

#[test]
fn negative_returns_flip_the_sign() {
    let mut tensors = HashMap::new();
    let log_probs = Tensor::from_vec(vec![3], vec![-0.1, -0.2, -0.3]);
    let returns = Tensor::from_vec(vec![3], vec![1.0, 0.5, -0.5]);
    let loss = policy_loss(&log_probs, &returns, &mut Graph::new(), &mut tensors).unwrap();
    let expected = -(-0.1 * 1.0 + -0.2 * 0.5 + -0.3 * -0.5);
    assert!((loss.data()[0] - expected).abs() < 1e-6);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let mut tensors = HashMap::new();
    let log_probs = Tensor::from_vec(vec![3], vec![-1.0, -1.0, -1.0]);
    let returns = Tensor::from_vec(vec![2], vec![1.0, 1.0]);
    let err = policy_loss(&log_probs, &returns, &mut Graph::new(), &mut tensors).unwrap_err();
    assert!(matches!(err, RlError::LengthMismatch { log_probs: 3, returns: 2 }));
}

#[test]
fn gradient_with_respect_to_log_probs_is_minus_returns() {
    let mut tensors = HashMap::new();
    let log_probs = Tensor::from_vec(vec![3], vec![-0.5, -1.5, -0.1]).with_grad();
    let returns = Tensor::from_vec(vec![3], vec![2.0, -1.0, 0.5]);
    let mut tape = Tape::new();
    let loss = policy_loss(&log_probs, &returns, &mut tape, &mut tensors).unwrap();
    tape.backward(&loss, &mut tensors).unwrap();
    assert_eq!(tensors[&log_probs.id].grad, Some(vec![-2.0, 1.0, -0.5]));
}
