//! CreateFolder operation.
//!
//! Creates a directory, and any missing ancestors, below the base directory.

use std::fs;

use tracing::{info, instrument, warn};

use super::{CreateFolderRequest, CreatedFolder, FolderError, FolderService};

impl FolderService {
    /// Create `request.folder_name` inside `request.path` (empty means the base).
    ///
    /// Creating a folder that already exists as a directory succeeds.
    #[instrument(skip_all, fields(path = %request.path, folder_name = %request.folder_name))]
    pub fn create_folder(&self, request: &CreateFolderRequest) -> Result<CreatedFolder, FolderError> {
        if request.folder_name.trim().is_empty() {
            return Err(FolderError::bad_request("folder_name must not be empty"));
        }

        let target = self
            .guard
            .resolve_child(&request.path, &request.folder_name)
            .map_err(|e| {
                warn!("Refusing to create folder: {}", e);
                FolderError::from(e)
            })?;
        let shown = self.display_path(&target);

        fs::create_dir_all(&target).map_err(|e| {
            warn!("Failed to create folder '{}': {}", shown, e);
            FolderError::internal("create folder", shown.clone(), e)
        })?;

        info!("Created folder {}", shown);

        Ok(CreatedFolder {
            path: target,
            display_path: shown,
        })
    }
}
