//! Containment of client-supplied paths inside the configured base directory.
//!
//! Every path a client sends is joined onto the [`BaseDirectory`], normalized
//! lexically and then compared against the base on separator boundaries.
//! Nothing touches the filesystem before that comparison has passed.

use std::io;
use std::path::{Component, MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

/// Errors that can occur while confining a path to the base directory.
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Path '{path}' resolves through a symlink outside the allowed root directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("Base directory path is empty")]
    EmptyBase,

    #[error("Cannot resolve base directory '{path}': {error}")]
    InvalidBase { path: PathBuf, error: io::Error },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

impl PathSecurityError {
    /// Whether this error means the client tried to leave the base directory.
    pub fn is_escape(&self) -> bool {
        matches!(
            self,
            Self::OutsideRootDirectory { .. } | Self::SymlinkOutsideRoot { .. }
        )
    }
}

/// The directory no request may leave.
///
/// Built once at startup; the stored path is absolute and lexically
/// normalized, and the comparison form always ends with a separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseDirectory {
    path: PathBuf,
    prefix: Vec<u8>,
}

impl BaseDirectory {
    /// Create a base directory from a configured path.
    ///
    /// Relative paths are made absolute against the current working
    /// directory. The directory does not have to exist yet.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, PathSecurityError> {
        let raw = path.as_ref();
        if raw.as_os_str().is_empty() {
            return Err(PathSecurityError::EmptyBase);
        }

        let absolute = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|error| PathSecurityError::InvalidBase {
                    path: raw.to_path_buf(),
                    error,
                })?
                .join(raw)
        };

        let path = normalize_lexically(&absolute);
        let prefix = canonical_bytes(&path);
        Ok(Self { path, prefix })
    }

    /// The normalized absolute path, without a trailing separator.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Display form with a trailing separator, e.g. `/srv/data/`.
    pub fn display(&self) -> String {
        with_trailing_separator(&self.path.to_string_lossy())
    }

    /// Whether an already normalized path lies inside (or is) this directory.
    pub fn contains(&self, normalized: &Path) -> bool {
        canonical_bytes(normalized).starts_with(&self.prefix)
    }

    /// Path of `normalized` below the base, `/`-separated; empty for the base itself.
    pub fn relative_display(&self, normalized: &Path) -> Option<String> {
        let rest = normalized.strip_prefix(&self.path).ok()?;
        let segments: Vec<_> = rest
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(segments.join("/"))
    }
}

/// Resolves untrusted paths against a [`BaseDirectory`].
#[derive(Debug, Clone)]
pub struct PathGuard {
    base: BaseDirectory,
    allow_symlinks: bool,
}

impl PathGuard {
    /// Create a guard that only performs the lexical containment check.
    pub fn new(base: BaseDirectory) -> Self {
        Self {
            base,
            allow_symlinks: true,
        }
    }

    /// When symlinks are disallowed, the physical location of the deepest
    /// existing ancestor must also lie inside the base directory.
    pub fn with_symlinks_allowed(mut self, allow: bool) -> Self {
        self.allow_symlinks = allow;
        self
    }

    pub fn base(&self) -> &BaseDirectory {
        &self.base
    }

    /// Resolve a client-supplied path.
    ///
    /// An empty path is the base directory itself. Absolute paths replace the
    /// base during the join and still have to pass the containment check.
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, PathSecurityError> {
        if requested.is_empty() {
            return Ok(self.base.as_path().to_path_buf());
        }

        let candidate = self.base.as_path().join(unify_separators(requested));
        self.confine(&candidate)
    }

    /// Resolve `name` below `parent`, where an empty `parent` means the base.
    ///
    /// Only the joined target is checked, so a parent outside the base is
    /// accepted as long as the final path lands inside it.
    pub fn resolve_child(&self, parent: &str, name: &str) -> Result<PathBuf, PathSecurityError> {
        let parent = if parent.is_empty() {
            self.base.as_path().to_path_buf()
        } else {
            self.base.as_path().join(unify_separators(parent))
        };

        let candidate = parent.join(unify_separators(name));
        self.confine(&candidate)
    }

    fn confine(&self, candidate: &Path) -> Result<PathBuf, PathSecurityError> {
        let resolved = normalize_lexically(candidate);

        if !self.base.contains(&resolved) {
            return Err(PathSecurityError::OutsideRootDirectory {
                path: resolved,
                root: self.base.as_path().to_path_buf(),
            });
        }

        if !self.allow_symlinks {
            self.check_physical_location(&resolved)?;
        }

        Ok(resolved)
    }

    fn check_physical_location(&self, resolved: &Path) -> Result<(), PathSecurityError> {
        let canonical_root =
            self.base
                .as_path()
                .canonicalize()
                .map_err(|error| PathSecurityError::IoError {
                    path: self.base.as_path().to_path_buf(),
                    error,
                })?;

        let Some(existing) = resolved.ancestors().find(|p| p.exists()) else {
            return Ok(());
        };

        let canonical = existing
            .canonicalize()
            .map_err(|error| PathSecurityError::IoError {
                path: existing.to_path_buf(),
                error,
            })?;

        if canonical.starts_with(&canonical_root) {
            Ok(())
        } else {
            Err(PathSecurityError::SymlinkOutsideRoot {
                path: resolved.to_path_buf(),
            })
        }
    }
}

/// Treat both `/` and `\` as separators regardless of platform.
fn unify_separators(raw: &str) -> String {
    raw.replace(['/', '\\'], MAIN_SEPARATOR_STR)
}

/// Resolve `.` and `..` without consulting the filesystem.
///
/// `..` at the root stays at the root; leading `..` of a relative path are kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut anchor = PathBuf::new();
    let mut rooted = false;
    let mut leading_parents = 0usize;
    let mut segments = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => anchor.push(prefix.as_os_str()),
            Component::RootDir => {
                anchor.push(Component::RootDir.as_os_str());
                rooted = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if segments.pop().is_none() && !rooted {
                    leading_parents += 1;
                }
            }
            Component::Normal(name) => segments.push(name),
        }
    }

    for _ in 0..leading_parents {
        anchor.push(Component::ParentDir.as_os_str());
    }
    anchor.extend(segments);
    anchor
}

/// Append a separator unless the path already ends with one.
///
/// Roots such as `/` or `C:\` are left alone; a bare drive designator such
/// as `C:` becomes `C:\` so it compares like its root.
pub fn with_trailing_separator(path: &str) -> String {
    if path.is_empty() {
        return MAIN_SEPARATOR_STR.to_string();
    }
    if path.ends_with(std::path::is_separator) {
        return path.to_string();
    }
    let mut out = String::with_capacity(path.len() + 1);
    out.push_str(path);
    out.push(MAIN_SEPARATOR);
    out
}

fn canonical_bytes(path: &Path) -> Vec<u8> {
    let mut bytes = path.as_os_str().as_encoded_bytes().to_vec();
    let ends_with_separator = bytes
        .last()
        .is_some_and(|b| std::path::is_separator(char::from(*b)));
    if !ends_with_separator {
        bytes.extend_from_slice(MAIN_SEPARATOR_STR.as_bytes());
    }
    bytes
}
