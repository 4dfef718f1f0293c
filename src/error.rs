//! Error types for the Subnetgate service.

use thiserror::Error;

/// Main error type for Subnetgate operations.
#[derive(Error, Debug)]
pub enum SubnetgateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Address cannot be decomposed into enough components for the
    /// configured prefix size
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Subnetgate operations.
pub type Result<T> = std::result::Result<T, SubnetgateError>;
