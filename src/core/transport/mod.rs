//! Transport layer for the folder browser server.
//!
//! Serves the folder operations over HTTP with axum. Routes:
//! - `GET /` greeting
//! - `GET /health` health check
//! - `GET /files?path=...` directory listing
//! - `POST /create-folder` folder creation

mod config;
mod error;

pub mod http;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
