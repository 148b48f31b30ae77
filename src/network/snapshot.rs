use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::math::matrix::MatrixSnapshot;
use crate::network::network::BackpropOrder;

/// Everything needed to rebuild a trained `NeuralNetwork`.
///
/// `activation` and `backprop_order` fall back to their defaults (tanh and
/// post-update ordering) when absent, so snapshots written without them
/// still load. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub input_nodes: usize,
    pub hidden_nodes: usize,
    pub output_nodes: usize,
    pub weights_ih: MatrixSnapshot,
    pub weights_ho: MatrixSnapshot,
    pub bias_h: MatrixSnapshot,
    pub bias_o: MatrixSnapshot,
    pub learning_rate: f64,
    #[serde(default)]
    pub activation: ActivationFunction,
    #[serde(default)]
    pub backprop_order: BackpropOrder,
}
