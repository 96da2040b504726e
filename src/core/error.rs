//! Error types and handling for the folder browser server.
//!
//! Domain errors (`FolderError`) are mapped to HTTP responses by the
//! transport; this module covers startup and infrastructure failures.

use thiserror::Error;

/// A specialized Result type for server setup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the folder browser server.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configured base directory could not be used.
    #[error("Path security error: {0}")]
    Security(#[from] crate::core::security::PathSecurityError),

    /// Errors from the HTTP transport.
    #[error("Transport error: {0}")]
    Transport(#[from] crate::core::transport::TransportError),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
