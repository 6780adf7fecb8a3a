//! Error types for the pipeline.

use thiserror::Error;

/// Pipeline-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Recoverable allocation failure while growing a chunk or model buffer
    #[error("Allocation failure: {0}")]
    Allocation(#[from] std::collections::TryReserveError),

    /// Invalid data error
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
