//! Folder Browser Server Library
//!
//! This crate serves a directory tree over HTTP: list folder contents and
//! create subfolders, confined to a configured base directory so callers
//! cannot escape it.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, path containment and the HTTP transport
//! - **domains**: business logic organized by bounded contexts
//!   - **folders**: the List and CreateFolder operations
//!
//! # Example
//!
//! ```rust,no_run
//! use folder_browser_server::{Config, FolderService, core::HttpTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let folders = FolderService::from_config(&config)?;
//!     HttpTransport::new(config.http.clone()).run(folders).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{BaseDirectory, Config, Error, PathGuard, Result};
pub use domains::folders::FolderService;
