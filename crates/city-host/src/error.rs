//! Host error type.

use respiration::RespirationError;
use thiserror::Error;

/// Errors reported by the `respiration_sim` binary.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(#[from] RespirationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<respiration::ConfigError> for SimError {
    fn from(err: respiration::ConfigError) -> Self {
        SimError::Config(RespirationError::Config(err))
    }
}
