//! Common error types for FCPA

use thiserror::Error;

/// Common result type for FCPA operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the conversion engine and its front ends
#[derive(Error, Debug)]
pub enum Error {
    /// Uploaded project is missing, unparsable, or not FCP5
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Session model setter given an out-of-domain value
    #[error("Validation error: {0}")]
    Validation(String),

    /// Seed session template could not be used
    #[error("Seed session error: {0}")]
    Seed(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the failure was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}
