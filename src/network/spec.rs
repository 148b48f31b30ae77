use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, NnResult};
use crate::network::network::{BackpropOrder, NeuralNetwork, DEFAULT_LEARNING_RATE};

/// Serializable description of a network and how it is trained.
///
/// A spec can be kept in a JSON file independently of any trained weights.
/// Everything except the node counts is optional in the file:
///
/// ```json
/// { "input_nodes": 2, "hidden_nodes": 2, "output_nodes": 1, "activation": "sigmoid" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_nodes: usize,
    pub hidden_nodes: usize,
    pub output_nodes: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default)]
    pub activation: ActivationFunction,
    #[serde(default)]
    pub backprop_order: BackpropOrder,
}

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

impl NetworkSpec {
    pub fn new(input_nodes: usize, hidden_nodes: usize, output_nodes: usize) -> NetworkSpec {
        NetworkSpec {
            input_nodes,
            hidden_nodes,
            output_nodes,
            learning_rate: DEFAULT_LEARNING_RATE,
            activation: ActivationFunction::default(),
            backprop_order: BackpropOrder::default(),
        }
    }

    pub fn validate(&self) -> NnResult<()> {
        if self.input_nodes == 0 || self.hidden_nodes == 0 || self.output_nodes == 0 {
            return Err(NnError::InvalidConfig(format!(
                "node counts must be positive, got {}-{}-{}",
                self.input_nodes, self.hidden_nodes, self.output_nodes
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NnError::InvalidConfig(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        self.activation.validate()
    }

    /// Validates the spec and creates a freshly initialised network from it.
    pub fn build(&self) -> NnResult<NeuralNetwork> {
        self.validate()?;
        let mut network = NeuralNetwork::new(self.input_nodes, self.hidden_nodes, self.output_nodes);
        network.set_learning_rate(self.learning_rate);
        network.set_activation_function(self.activation);
        network.set_backprop_order(self.backprop_order);
        Ok(network)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> NnResult<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> NnResult<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}
