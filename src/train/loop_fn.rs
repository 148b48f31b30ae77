use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::seq::SliceRandom;

use crate::error::{NnError, NnResult};
use crate::loss::mse::MseLoss;
use crate::network::network::NeuralNetwork;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs of online SGD and returns the
/// mean loss of the **last completed epoch** (0.0 if no epoch ran).
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `InvalidConfig` when `inputs` is empty, its length differs from
/// `targets`, or the network has no outputs; `InputLength` when a sample
/// does not fit the network. The whole dataset is checked before the first
/// update, so a rejected call leaves the network untouched.
pub fn train_loop(
    network: &mut NeuralNetwork,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    config: &TrainConfig,
) -> NnResult<f64> {
    check_dataset(network, inputs, targets)?;

    let mut last_loss = 0.0;
    let mut order: Vec<usize> = (0..inputs.len()).collect();
    let mut rng = rand::thread_rng();

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            tracing::debug!(epoch, "stop flag set, ending training");
            break;
        }

        let t_start = Instant::now();

        if config.shuffle {
            order.shuffle(&mut rng);
        }

        let loss = run_one_epoch(network, inputs, targets, &order)?;
        last_loss = loss;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            loss,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        tracing::trace!(epoch, loss, "epoch complete");

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                tracing::debug!(epoch, "progress receiver dropped, ending training");
                break;
            }
        }
    }

    tracing::debug!(loss = last_loss, "training finished");
    Ok(last_loss)
}

/// Mean squared error over a dataset without updating the network.
pub fn evaluate(network: &NeuralNetwork, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> NnResult<f64> {
    check_dataset(network, inputs, targets)?;
    let mut total = 0.0;
    for (input, target) in inputs.iter().zip(targets) {
        let output = network.predict(input)?;
        total += MseLoss::loss(&output, target);
    }
    Ok(total / inputs.len() as f64)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// One pass over the data in `order`; returns the mean pre-update loss.
fn run_one_epoch(
    network: &mut NeuralNetwork,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    order: &[usize],
) -> NnResult<f64> {
    let mut total_loss = 0.0;

    for &idx in order {
        let output = network.predict(&inputs[idx])?;
        total_loss += MseLoss::loss(&output, &targets[idx]);
        network.train(&inputs[idx], &targets[idx])?;
    }

    Ok(total_loss / order.len() as f64)
}

/// Rejects datasets the network cannot score: no samples, unpaired
/// samples, a network without outputs, or vectors of the wrong length.
fn check_dataset(network: &NeuralNetwork, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> NnResult<()> {
    if network.output_nodes() == 0 {
        return Err(NnError::InvalidConfig("network has no output nodes".to_string()));
    }
    if inputs.is_empty() {
        return Err(NnError::InvalidConfig("dataset is empty".to_string()));
    }
    if inputs.len() != targets.len() {
        return Err(NnError::InvalidConfig(format!(
            "{} inputs but {} targets",
            inputs.len(),
            targets.len()
        )));
    }
    for (input, target) in inputs.iter().zip(targets) {
        if input.len() != network.input_nodes() {
            return Err(NnError::InputLength { expected: network.input_nodes(), actual: input.len() });
        }
        if target.len() != network.output_nodes() {
            return Err(NnError::InputLength { expected: network.output_nodes(), actual: target.len() });
        }
    }
    Ok(())
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}
