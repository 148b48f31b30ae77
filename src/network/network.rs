use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, NnResult};
use crate::math::matrix::Matrix;
use crate::network::snapshot::NetworkSnapshot;

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Uniform half-range used to initialise weight matrices.
const WEIGHT_RANGE: f64 = 1.0;
/// Uniform half-range used to initialise bias vectors.
const BIAS_RANGE: f64 = 0.1;

/// Which `weights_ho` the hidden-layer error is propagated through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackpropOrder {
    /// `weights_ho` is updated first and the hidden error is computed from
    /// the already-updated matrix.
    #[default]
    PostUpdate,
    /// Textbook backpropagation: the hidden error uses `weights_ho` as it
    /// was during the forward pass.
    PreUpdate,
}

/// Input -> hidden -> output perceptron trained by online SGD.
///
/// Shapes are fixed at construction:
/// `weights_ih` is `hidden x input`, `weights_ho` is `output x hidden`,
/// `bias_h` is `hidden x 1` and `bias_o` is `output x 1`.
///
/// Not synchronised: confine each instance to one thread at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNetwork {
    input_nodes: usize,
    hidden_nodes: usize,
    output_nodes: usize,
    weights_ih: Matrix,
    weights_ho: Matrix,
    bias_h: Matrix,
    bias_o: Matrix,
    learning_rate: f64,
    activation: ActivationFunction,
    backprop_order: BackpropOrder,
}

impl NeuralNetwork {
    /// Fresh network with weights in `[-1, 1]` and biases in `[-0.1, 0.1]`.
    pub fn new(input_nodes: usize, hidden_nodes: usize, output_nodes: usize) -> NeuralNetwork {
        NeuralNetwork::with_rng(input_nodes, hidden_nodes, output_nodes, &mut rand::thread_rng())
    }

    /// Same as `new`, drawing the initial parameters from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        input_nodes: usize,
        hidden_nodes: usize,
        output_nodes: usize,
        rng: &mut R,
    ) -> NeuralNetwork {
        let mut weights_ih = Matrix::new(hidden_nodes, input_nodes);
        let mut weights_ho = Matrix::new(output_nodes, hidden_nodes);
        weights_ih.randomize_with(WEIGHT_RANGE, rng);
        weights_ho.randomize_with(WEIGHT_RANGE, rng);

        let mut bias_h = Matrix::new(hidden_nodes, 1);
        let mut bias_o = Matrix::new(output_nodes, 1);
        bias_h.randomize_with(BIAS_RANGE, rng);
        bias_o.randomize_with(BIAS_RANGE, rng);

        tracing::debug!(input_nodes, hidden_nodes, output_nodes, "initialised network");

        NeuralNetwork {
            input_nodes,
            hidden_nodes,
            output_nodes,
            weights_ih,
            weights_ho,
            bias_h,
            bias_o,
            learning_rate: DEFAULT_LEARNING_RATE,
            activation: ActivationFunction::default(),
            backprop_order: BackpropOrder::default(),
        }
    }

    pub fn input_nodes(&self) -> usize {
        self.input_nodes
    }

    pub fn hidden_nodes(&self) -> usize {
        self.hidden_nodes
    }

    pub fn output_nodes(&self) -> usize {
        self.output_nodes
    }

    pub fn weights_ih(&self) -> &Matrix {
        &self.weights_ih
    }

    pub fn weights_ho(&self) -> &Matrix {
        &self.weights_ho
    }

    pub fn bias_h(&self) -> &Matrix {
        &self.bias_h
    }

    pub fn bias_o(&self) -> &Matrix {
        &self.bias_o
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn backprop_order(&self) -> BackpropOrder {
        self.backprop_order
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    pub fn set_activation_function(&mut self, activation: ActivationFunction) {
        self.activation = activation;
    }

    pub fn set_backprop_order(&mut self, order: BackpropOrder) {
        self.backprop_order = order;
    }

    /// Forward pass. Never touches the network's parameters.
    pub fn predict(&self, input: &[f64]) -> NnResult<Vec<f64>> {
        check_len(self.input_nodes, input)?;
        let inputs = Matrix::from_array(input);
        let (_, outputs) = self.feed_forward(&inputs)?;
        Ok(outputs.to_array())
    }

    /// One backpropagation step for a single `(input, target)` pair.
    ///
    /// Length preconditions are checked up front, so a rejected call leaves
    /// every weight and bias as it was.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> NnResult<()> {
        check_len(self.input_nodes, input)?;
        check_len(self.output_nodes, target)?;

        let inputs = Matrix::from_array(input);
        let (hidden, outputs) = self.feed_forward(&inputs)?;
        let targets = Matrix::from_array(target);

        // target - prediction; the updates below are added, not subtracted.
        let output_errors = Matrix::subtract(&targets, &outputs)?;

        let act = self.activation;
        let mut gradients = outputs.mapped(|y, _, _| act.derivative(y));
        gradients.hadamard(&output_errors)?.scale(self.learning_rate);

        let weight_ho_deltas = Matrix::product(&gradients, &hidden.transpose())?;

        let pre_update_who_t = match self.backprop_order {
            BackpropOrder::PreUpdate => Some(self.weights_ho.transpose()),
            BackpropOrder::PostUpdate => None,
        };

        self.weights_ho.add(&weight_ho_deltas)?;
        self.bias_o.add(&gradients)?;

        let who_t = pre_update_who_t.unwrap_or_else(|| self.weights_ho.transpose());
        let hidden_errors = Matrix::product(&who_t, &output_errors)?;

        let mut hidden_gradient = hidden.mapped(|y, _, _| act.derivative(y));
        hidden_gradient.hadamard(&hidden_errors)?.scale(self.learning_rate);

        let weight_ih_deltas = Matrix::product(&hidden_gradient, &inputs.transpose())?;
        self.weights_ih.add(&weight_ih_deltas)?;
        self.bias_h.add(&hidden_gradient)?;

        Ok(())
    }

    /// Independent deep copy, including learning rate, activation and
    /// backprop order.
    pub fn copy(&self) -> NeuralNetwork {
        self.clone()
    }

    /// Applies `f` to every weight and bias. Used for evolutionary search;
    /// unrelated to `train`.
    pub fn mutate<F>(&mut self, mut f: F)
    where
        F: FnMut(f64) -> f64,
    {
        for m in [&mut self.weights_ih, &mut self.weights_ho, &mut self.bias_h, &mut self.bias_o] {
            m.map_in_place(|v, _, _| f(v));
        }
    }

    pub fn serialize(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            input_nodes: self.input_nodes,
            hidden_nodes: self.hidden_nodes,
            output_nodes: self.output_nodes,
            weights_ih: self.weights_ih.to_snapshot(),
            weights_ho: self.weights_ho.to_snapshot(),
            bias_h: self.bias_h.to_snapshot(),
            bias_o: self.bias_o.to_snapshot(),
            learning_rate: self.learning_rate,
            activation: self.activation,
            backprop_order: self.backprop_order,
        }
    }

    /// Rebuilds a network from a snapshot, checking every matrix against the
    /// declared node counts.
    pub fn deserialize(snapshot: NetworkSnapshot) -> NnResult<NeuralNetwork> {
        let (i, h, o) = (snapshot.input_nodes, snapshot.hidden_nodes, snapshot.output_nodes);
        snapshot.activation.validate()?;

        let weights_ih = expect_shape("weights_ih", Matrix::from_snapshot(snapshot.weights_ih)?, (h, i))?;
        let weights_ho = expect_shape("weights_ho", Matrix::from_snapshot(snapshot.weights_ho)?, (o, h))?;
        let bias_h = expect_shape("bias_h", Matrix::from_snapshot(snapshot.bias_h)?, (h, 1))?;
        let bias_o = expect_shape("bias_o", Matrix::from_snapshot(snapshot.bias_o)?, (o, 1))?;

        tracing::debug!(i, h, o, activation = %snapshot.activation, "restored network from snapshot");

        Ok(NeuralNetwork {
            input_nodes: i,
            hidden_nodes: h,
            output_nodes: o,
            weights_ih,
            weights_ho,
            bias_h,
            bias_o,
            learning_rate: snapshot.learning_rate,
            activation: snapshot.activation,
            backprop_order: snapshot.backprop_order,
        })
    }

    pub fn to_json(&self) -> NnResult<String> {
        Ok(serde_json::to_string(&self.serialize())?)
    }

    pub fn from_json(json: &str) -> NnResult<NeuralNetwork> {
        NeuralNetwork::deserialize(serde_json::from_str(json)?)
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> NnResult<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &self.serialize())?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> NnResult<NeuralNetwork> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        NeuralNetwork::deserialize(serde_json::from_reader(reader)?)
    }

    /// Returns the post-activation hidden and output column vectors.
    fn feed_forward(&self, inputs: &Matrix) -> NnResult<(Matrix, Matrix)> {
        let act = self.activation;

        let mut hidden = Matrix::product(&self.weights_ih, inputs)?;
        hidden.add(&self.bias_h)?.map_in_place(|x, _, _| act.function(x));

        let mut outputs = Matrix::product(&self.weights_ho, &hidden)?;
        outputs.add(&self.bias_o)?.map_in_place(|x, _, _| act.function(x));

        Ok((hidden, outputs))
    }
}

fn check_len(expected: usize, values: &[f64]) -> NnResult<()> {
    if values.len() != expected {
        return Err(NnError::InputLength { expected, actual: values.len() });
    }
    Ok(())
}

fn expect_shape(name: &str, m: Matrix, shape: (usize, usize)) -> NnResult<Matrix> {
    if m.shape() != shape {
        return Err(NnError::MalformedSnapshot(format!(
            "{name} is {}x{}, node counts require {}x{}",
            m.rows(), m.cols(), shape.0, shape.1
        )));
    }
    Ok(m)
}
