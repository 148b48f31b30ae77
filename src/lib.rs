pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use error::{NnError, NnResult};
pub use math::matrix::{Matrix, MatrixSnapshot};
pub use activation::activation::ActivationFunction;
pub use network::network::{BackpropOrder, NeuralNetwork};
pub use network::snapshot::NetworkSnapshot;
pub use network::spec::NetworkSpec;
pub use loss::mse::MseLoss;
pub use train::{evaluate, train_loop, EpochStats, TrainConfig};
