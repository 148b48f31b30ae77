pub mod mutation;
pub mod network;
pub mod snapshot;
pub mod spec;

pub use network::{BackpropOrder, NeuralNetwork};
pub use snapshot::NetworkSnapshot;
pub use spec::NetworkSpec;
