use perceptron::{ActivationFunction, NeuralNetwork};

fn main() {
    let mut network = NeuralNetwork::new(2, 2, 1);
    network.set_activation_function(ActivationFunction::Sigmoid);
    network.set_learning_rate(0.1);

    let samples = [
        ([0.0, 0.0], [0.0]),
        ([0.0, 1.0], [1.0]),
        ([1.0, 0.0], [1.0]),
        ([1.0, 1.0], [0.0]),
    ];

    for _ in 0..100_000 {
        for (input, target) in &samples {
            if let Err(e) = network.train(input, target) {
                eprintln!("training failed: {e}");
                return;
            }
        }
    }

    for (input, _) in &samples {
        match network.predict(input) {
            Ok(output) => println!("Input: {:?} -> Output: {:.4}", input, output[0]),
            Err(e) => eprintln!("prediction failed: {e}"),
        }
    }
}
