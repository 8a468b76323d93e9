//! Error types for the switch state model.

use thiserror::Error;

/// Device-level operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// No main transceiver connection (auxiliary id 0) is registered.
    #[error("no main transceiver connection whose aux ID is 0")]
    NoMainConnection,

    /// Writing a message to the switch failed.
    #[error("writing message to switch: {0}")]
    Write(#[from] std::io::Error),
}

/// Result type for device operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
