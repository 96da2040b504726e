//! Folders domain - browsing and creating directories below the base directory.
//!
//! This module provides:
//! - **List**: enumerate the immediate children of a directory
//! - **CreateFolder**: create a directory (and missing ancestors)
//!
//! Both operations resolve client paths through the
//! [`PathGuard`](crate::core::security::PathGuard) before any filesystem call.

mod create;
mod error;
mod list;
mod model;
mod service;

pub use error::FolderError;
pub use model::{
    CreateFolderRequest, CreatedFolder, DirectoryEntry, DirectoryListing, DisplayPathMode,
};
pub use service::FolderService;
