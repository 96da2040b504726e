//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the server:
//! configuration, error handling, path containment and the HTTP transport.

pub mod config;
pub mod error;
pub mod security;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::{BaseDirectory, PathGuard, PathSecurityError};
pub use transport::{HttpConfig, HttpTransport};
