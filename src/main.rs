//! Trains the XOR benchmark and prints the learned truth table.
//!
//! Usage:
//!   perceptron [SPEC.json] [OUT.json]
//!
//! `SPEC.json` is a `NetworkSpec`; without it a 2-2-1 sigmoid network is
//! used. When `OUT.json` is given the trained snapshot is written there.
//! Set `RUST_LOG=perceptron=debug` for more detail.

use perceptron::{evaluate, train_loop, ActivationFunction, NetworkSpec, NnResult, TrainConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EPOCHS: usize = 100_000;

fn main() -> NnResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perceptron=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);

    let spec = match args.next() {
        Some(path) => {
            tracing::info!(%path, "loading network spec");
            NetworkSpec::load_json(&path)?
        }
        None => {
            let mut spec = NetworkSpec::new(2, 2, 1);
            spec.activation = ActivationFunction::Sigmoid;
            spec
        }
    };
    let mut network = spec.build()?;

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let targets = vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]];

    tracing::info!(
        activation = %network.activation(),
        learning_rate = network.learning_rate(),
        epochs = EPOCHS,
        "training xor"
    );
    let loss = train_loop(&mut network, &inputs, &targets, &TrainConfig::new(EPOCHS))?;
    tracing::info!(loss, final_mse = evaluate(&network, &inputs, &targets)?, "done");

    for input in &inputs {
        println!("{:?} -> {:.4}", input, network.predict(input)?[0]);
    }

    if let Some(out) = args.next() {
        network.save_json(&out)?;
        tracing::info!(path = %out, "saved trained network");
    }

    Ok(())
}
