//! Core error types for PortfolioX.
//!
//! Storage-specific failures are carried as strings so the error type
//! stays backend-agnostic. Provider failures never show up here: they are
//! degraded inside the market-data crate and a refresh cycle cannot fail
//! on them.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The durable store could not be read or written. Surfaced to the
    /// caller: an edit that cannot be saved must produce a warning, not
    /// vanish silently.
    #[error("Storage operation failed: {0}")]
    Storage(String),

    /// The remote document store rejected or failed a call.
    #[error("Remote store error: {0}")]
    RemoteStore(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
