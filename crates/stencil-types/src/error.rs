use thiserror::Error;

#[derive(Error, Debug)]
pub enum StencilError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Squared error {measured} exceeds threshold {threshold:e}")]
    Validation { measured: f64, threshold: f64 },

    #[error("Region shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Synchronization failure: {0}")]
    Sync(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StencilResult<T> = Result<T, StencilError>;
