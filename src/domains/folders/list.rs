//! List operation.
//!
//! Enumerates the immediate children of a directory below the base.

use std::fs;
use std::io;

use tracing::{info, instrument, warn};

use super::{DirectoryEntry, DirectoryListing, FolderError, FolderService};

impl FolderService {
    /// List the directory at `requested` (empty or `None` means the base).
    #[instrument(skip(self))]
    pub fn list(&self, requested: Option<&str>) -> Result<DirectoryListing, FolderError> {
        let requested = requested.unwrap_or_default();

        let path = self.guard.resolve(requested).map_err(|e| {
            warn!("Path security validation failed: {}", e);
            FolderError::from(e)
        })?;
        let shown = self.display_path(&path);

        let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => FolderError::NotFound {
                path: shown.clone(),
            },
            _ => FolderError::internal("access", shown.clone(), e),
        })?;

        if !metadata.is_dir() {
            warn!("Path is not a directory: {}", shown);
            return Err(FolderError::NotADirectory { path: shown });
        }

        let entries =
            fs::read_dir(&path).map_err(|e| FolderError::internal("list", shown.clone(), e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Error reading entry: {}", e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(e) => {
                    warn!("Failed to get file type for {}: {}", name, e);
                    continue;
                }
            };

            files.push(DirectoryEntry {
                name,
                is_dir: file_type.is_dir(),
            });
        }

        if self.sort_entries {
            files.sort_by(|a, b| a.name.cmp(&b.name));
        }

        info!("Listed {} entries in {}", files.len(), shown);

        Ok(DirectoryListing {
            current_path: shown,
            files,
        })
    }
}
