// End-to-end XOR benchmark: 2-2-1 sigmoid network, learning rate 0.1,
// 100 000 epochs of online SGD over the four samples.
//
// A network this small sometimes settles in a local minimum (outputs stuck
// near 0.5 for two of the patterns), so each test walks a fixed list of
// seeds and requires one of them to converge.

use perceptron::{ActivationFunction, BackpropOrder, NeuralNetwork};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SAMPLES: [([f64; 2], [f64; 1]); 4] = [
    ([0.0, 0.0], [0.0]),
    ([0.0, 1.0], [1.0]),
    ([1.0, 0.0], [1.0]),
    ([1.0, 1.0], [0.0]),
];
const EPOCHS: usize = 100_000;
const SEEDS: u64 = 10;

fn train_xor(seed: u64, order: BackpropOrder) -> NeuralNetwork {
    let mut nn = NeuralNetwork::with_rng(2, 2, 1, &mut StdRng::seed_from_u64(seed));
    nn.set_activation_function(ActivationFunction::Sigmoid);
    nn.set_learning_rate(0.1);
    nn.set_backprop_order(order);
    for _ in 0..EPOCHS {
        for (input, target) in &SAMPLES {
            nn.train(input, target).unwrap();
        }
    }
    nn
}

fn worst_error(nn: &NeuralNetwork) -> f64 {
    SAMPLES
        .iter()
        .map(|(input, target)| (nn.predict(input).unwrap()[0] - target[0]).abs())
        .fold(0.0, f64::max)
}

fn converges(order: BackpropOrder) -> bool {
    (0..SEEDS).any(|seed| worst_error(&train_xor(seed, order)) < 0.1)
}

#[test]
fn xor_converges_with_post_update_order() {
    assert!(converges(BackpropOrder::PostUpdate));
}

#[test]
fn xor_converges_with_pre_update_order() {
    assert!(converges(BackpropOrder::PreUpdate));
}
