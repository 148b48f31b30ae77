// Behaviour of the network as a whole: forward pass, copies, mutation.

use approx::assert_abs_diff_eq;
use perceptron::network::mutation;
use perceptron::{ActivationFunction, BackpropOrder, NeuralNetwork, NnError};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded(seed: u64) -> NeuralNetwork {
    NeuralNetwork::with_rng(3, 4, 2, &mut StdRng::seed_from_u64(seed))
}

#[test]
fn predict_returns_one_value_per_output_node() {
    let nn = seeded(1);
    assert_eq!(nn.predict(&[0.1, 0.2, 0.3]).unwrap().len(), 2);
}

#[test]
fn predict_is_deterministic_and_pure() {
    let nn = seeded(2);
    let before = nn.copy();
    let first = nn.predict(&[0.5, -0.5, 1.0]).unwrap();
    for _ in 0..10 {
        assert_eq!(nn.predict(&[0.5, -0.5, 1.0]).unwrap(), first);
    }
    assert_eq!(nn, before);
}

#[test]
fn tanh_outputs_stay_within_unit_range() {
    let nn = seeded(3);
    for v in nn.predict(&[50.0, -50.0, 10.0]).unwrap() {
        assert!((-1.0..=1.0).contains(&v));
    }
}

#[test]
fn forward_pass_matches_manual_computation() {
    let mut nn = NeuralNetwork::with_rng(2, 2, 1, &mut StdRng::seed_from_u64(4));
    nn.set_activation_function(ActivationFunction::Sigmoid);
    let input = [0.7, -0.2];

    let s = |x: f64| 1.0 / (1.0 + (-x).exp());
    let (wih, who, bh, bo) = (nn.weights_ih(), nn.weights_ho(), nn.bias_h(), nn.bias_o());
    let h: Vec<f64> = (0..2)
        .map(|j| s(wih[(j, 0)] * input[0] + wih[(j, 1)] * input[1] + bh[(j, 0)]))
        .collect();
    let o = s(who[(0, 0)] * h[0] + who[(0, 1)] * h[1] + bo[(0, 0)]);

    assert_abs_diff_eq!(nn.predict(&input).unwrap()[0], o, epsilon = 1e-12);
}

#[test]
fn training_moves_prediction_toward_target() {
    let mut nn = seeded(5);
    let input = [0.2, 0.4, -0.1];
    let target = [0.6, -0.3];
    let err = |nn: &NeuralNetwork| -> f64 {
        nn.predict(&input).unwrap().iter().zip(target).map(|(p, t)| (p - t).abs()).sum()
    };
    let before = err(&nn);
    for _ in 0..50 {
        nn.train(&input, &target).unwrap();
    }
    assert!(err(&nn) < before);
}

#[test]
fn pre_update_order_also_learns() {
    let mut nn = seeded(6);
    nn.set_backprop_order(BackpropOrder::PreUpdate);
    let input = [1.0, 0.0, 0.5];
    let target = [0.5, 0.5];
    let before: f64 = nn.predict(&input).unwrap().iter().map(|p| (p - 0.5).abs()).sum();
    for _ in 0..100 {
        nn.train(&input, &target).unwrap();
    }
    let after: f64 = nn.predict(&input).unwrap().iter().map(|p| (p - 0.5).abs()).sum();
    assert!(after < before);
}

#[test]
fn mutating_a_copy_leaves_the_source_alone() {
    let net = seeded(7);
    let original = net.copy();

    let mut a = net.copy();
    a.mutate(|v| v + 1.0);

    assert_eq!(net, original);
    assert_ne!(a, net);
    assert_abs_diff_eq!(a.weights_ih()[(0, 0)], net.weights_ih()[(0, 0)] + 1.0, epsilon = 1e-12);
}

#[test]
fn training_a_copy_leaves_the_source_alone() {
    let net = seeded(8);
    let original = net.copy();
    let mut a = net.copy();
    a.train(&[1.0, 1.0, 1.0], &[0.0, 0.0]).unwrap();
    assert_eq!(net, original);
}

#[test]
fn copy_keeps_training_settings() {
    let mut net = seeded(9);
    net.set_learning_rate(0.42);
    net.set_activation_function(ActivationFunction::leaky_relu());
    net.set_backprop_order(BackpropOrder::PreUpdate);

    let c = net.copy();
    assert_eq!(c.learning_rate(), 0.42);
    assert_eq!(c.activation(), ActivationFunction::leaky_relu());
    assert_eq!(c.backprop_order(), BackpropOrder::PreUpdate);
}

#[test]
fn gaussian_mutation_changes_some_parameters() {
    let net = seeded(10);
    let mut child = net.copy();
    child.mutate(mutation::gaussian(0.5, 0.1, StdRng::seed_from_u64(11)));
    assert_ne!(child, net);
    assert_eq!(child.weights_ih().shape(), net.weights_ih().shape());
}

#[test]
fn length_preconditions_are_reported() {
    let mut nn = seeded(12);
    let err = nn.predict(&[1.0, 2.0]).unwrap_err();
    assert_eq!(err.to_string(), "expected a vector of length 3, got 2");
    assert!(matches!(nn.train(&[1.0, 2.0, 3.0], &[1.0]), Err(NnError::InputLength { expected: 2, actual: 1 })));
}
