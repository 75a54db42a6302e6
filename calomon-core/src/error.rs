//! Error types for calomon-core.

use thiserror::Error;

use crate::cell::Region;

/// Result type alias for calomon operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for calomon operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Worker configuration rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Run-scoped resources could not be obtained.
    #[error("setup error: {0}")]
    Setup(String),

    /// Cell coordinates outside the region's index range.
    #[error("invalid {region} cell: ({u}, {v})")]
    InvalidCell { region: Region, u: i32, v: i32 },
}
