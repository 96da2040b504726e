//! Request and response shapes for the folders domain.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::FolderError;

/// A single child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Response of the List operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// The listed directory, rendered per [`DisplayPathMode`].
    pub current_path: String,

    /// Immediate children of the directory.
    pub files: Vec<DirectoryEntry>,
}

/// Body of a CreateFolder request.
///
/// Missing fields decode as empty strings; an empty `path` means the base
/// directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub folder_name: String,
}

impl CreateFolderRequest {
    pub fn new(path: impl Into<String>, folder_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            folder_name: folder_name.into(),
        }
    }

    /// Decode a request body, mapping any JSON failure to a bad request.
    pub fn from_json(body: &[u8]) -> Result<Self, FolderError> {
        serde_json::from_slice(body)
            .map_err(|e| FolderError::bad_request(format!("could not decode request JSON: {}", e)))
    }
}

/// Outcome of a successful CreateFolder call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedFolder {
    /// Absolute path of the directory on disk.
    pub path: PathBuf,

    /// The same path rendered per [`DisplayPathMode`].
    pub display_path: String,
}

/// How paths are rendered back to clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPathMode {
    /// Absolute path with a trailing separator, e.g. `/srv/data/reports/`.
    #[default]
    Absolute,

    /// Path below the base directory, `/`-separated; empty for the base.
    Relative,
}

impl FromStr for DisplayPathMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "relative" => Ok(Self::Relative),
            other => Err(format!(
                "unknown display path mode '{}' (expected 'absolute' or 'relative')",
                other
            )),
        }
    }
}
