//! Folder-specific error types.

use std::io;

use thiserror::Error;

use crate::core::security::PathSecurityError;

/// Errors that can occur during folder operations.
#[derive(Debug, Error)]
pub enum FolderError {
    /// The request referenced a location outside the base directory.
    #[error("Access denied: attempt to access outside the base directory")]
    PathEscape(#[source] PathSecurityError),

    /// The target path does not exist.
    #[error("Path '{path}' does not exist")]
    NotFound { path: String },

    /// The target exists but is not a directory.
    #[error("'{path}' is not a directory")]
    NotADirectory { path: String },

    /// The request body or its fields were malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The HTTP method is not accepted for this operation.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The underlying filesystem call failed.
    #[error("Failed to {action} '{path}': {source}")]
    Internal {
        action: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },
}

impl FolderError {
    /// Create a new "bad request" error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a new internal error for a failed filesystem call.
    pub fn internal(action: &'static str, path: impl Into<String>, source: io::Error) -> Self {
        Self::Internal {
            action,
            path: path.into(),
            source,
        }
    }
}

impl From<PathSecurityError> for FolderError {
    fn from(err: PathSecurityError) -> Self {
        match err {
            err if err.is_escape() => Self::PathEscape(err),
            PathSecurityError::IoError { path, error }
            | PathSecurityError::InvalidBase { path, error } => {
                Self::internal("resolve", path.to_string_lossy(), error)
            }
            other => Self::internal(
                "resolve",
                String::new(),
                io::Error::other(other.to_string()),
            ),
        }
    }
}
