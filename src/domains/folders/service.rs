//! Folder service - holds the base directory and the two folder operations.
//!
//! The operations themselves live in `list.rs` and `create.rs`.

use std::path::Path;

use tracing::info;

use super::DisplayPathMode;
use crate::core::config::Config;
use crate::core::security::path_guard::with_trailing_separator;
use crate::core::security::{BaseDirectory, PathGuard};

/// Service for listing and creating folders below the base directory.
///
/// Immutable after construction; share it across requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct FolderService {
    pub(super) guard: PathGuard,
    pub(super) display_mode: DisplayPathMode,
    pub(super) sort_entries: bool,
}

impl FolderService {
    /// Create a service with absolute display paths and sorted listings.
    pub fn new(guard: PathGuard) -> Self {
        Self {
            guard,
            display_mode: DisplayPathMode::default(),
            sort_entries: true,
        }
    }

    /// Build the service from configuration.
    ///
    /// Fails when no base directory is configured and no fallback is set.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let base = config.base_directory()?;
        info!(
            "Serving base directory {} (display: {:?}, sorted: {}, symlinks allowed: {})",
            base.display(),
            config.storage.display_path,
            config.storage.sort_entries,
            config.security.allow_symlinks
        );

        let guard = PathGuard::new(base).with_symlinks_allowed(config.security.allow_symlinks);
        Ok(Self::new(guard)
            .with_display_mode(config.storage.display_path)
            .with_sorted_entries(config.storage.sort_entries))
    }

    pub fn with_display_mode(mut self, mode: DisplayPathMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn with_sorted_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    pub fn base(&self) -> &BaseDirectory {
        self.guard.base()
    }

    /// Render a resolved path for clients.
    pub(super) fn display_path(&self, resolved: &Path) -> String {
        match self.display_mode {
            DisplayPathMode::Absolute => with_trailing_separator(&resolved.to_string_lossy()),
            DisplayPathMode::Relative => self
                .base()
                .relative_display(resolved)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::MAIN_SEPARATOR;
    use tempfile::TempDir;

    fn service(root: &Path) -> FolderService {
        FolderService::new(PathGuard::new(BaseDirectory::new(root).unwrap()))
    }

    #[test]
    fn test_display_absolute_has_trailing_separator() {
        let temp_dir = TempDir::new().unwrap();
        let svc = service(temp_dir.path());
        let shown = svc.display_path(&svc.base().as_path().join("reports"));
        assert!(shown.ends_with(&format!("reports{MAIN_SEPARATOR}")));
    }

    #[test]
    fn test_display_relative() {
        let temp_dir = TempDir::new().unwrap();
        let svc = service(temp_dir.path()).with_display_mode(DisplayPathMode::Relative);
        let base = svc.base().as_path().to_path_buf();

        assert_eq!(svc.display_path(&base), "");
        assert_eq!(svc.display_path(&base.join("a").join("b")), "a/b");
    }

    #[test]
    fn test_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_string_lossy().to_string();
        let vars = HashMap::from([
            ("BASE_DIR_PATH", root.as_str()),
            ("DISPLAY_PATH", "relative"),
            ("SORT_ENTRIES", "false"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        let svc = FolderService::from_config(&config).unwrap();
        assert_eq!(svc.base().as_path(), temp_dir.path());
        assert_eq!(svc.display_mode, DisplayPathMode::Relative);
        assert!(!svc.sort_entries);
    }

    #[test]
    fn test_from_config_without_base_fails() {
        let config = Config::from_lookup(|_| None);
        assert!(FolderService::from_config(&config).is_err());
    }
}
