//! Error types for calomon-tasks.

use thiserror::Error;

/// Result type for worker operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Worker error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Core library error (configuration and setup failures).
    #[error("core error: {0}")]
    Core(#[from] calomon_core::Error),

    /// No factory registered under the requested name.
    #[error("unknown worker: {0}")]
    UnknownWorker(String),

    /// Metric name not present in the ordering table.
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for a rejected worker configuration.
    #[must_use]
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Error::Core(calomon_core::Error::InvalidConfiguration(_)))
    }

    /// Returns true for a failure to obtain run resources.
    #[must_use]
    pub fn is_setup(&self) -> bool {
        matches!(self, Error::Core(calomon_core::Error::Setup(_)))
    }
}
