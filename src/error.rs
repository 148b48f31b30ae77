use thiserror::Error;

/// Result alias used throughout the crate.
pub type NnResult<T> = Result<T, NnError>;

/// Everything that can go wrong while building, running or persisting a network.
#[derive(Debug, Error)]
pub enum NnError {
    /// Two matrices were combined with incompatible dimensions.
    /// Neither operand is modified when this is returned.
    #[error("shape mismatch in {op}: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// An input or target vector does not match the layer it feeds.
    #[error("expected a vector of length {expected}, got {actual}")]
    InputLength { expected: usize, actual: usize },

    /// A snapshot whose grid or matrices disagree with its declared shape.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("unknown activation function '{0}'")]
    UnknownActivation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
