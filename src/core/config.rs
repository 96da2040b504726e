//! Configuration management for the folder browser server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (optionally via a `.env` file) or defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use super::error::{Error, Result};
use super::security::BaseDirectory;
use super::transport::HttpConfig;
use crate::domains::folders::DisplayPathMode;

/// Main configuration structure for the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Base directory and listing behaviour.
    pub storage: StorageConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// HTTP transport configuration.
    pub http: HttpConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported in logs.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration of the served directory tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory no request may leave (`BASE_DIR_PATH`).
    pub base_dir: Option<PathBuf>,

    /// Explicit default used only when `base_dir` is unset.
    /// When both are unset, startup fails.
    pub fallback_base_dir: Option<PathBuf>,

    /// How listed and created paths are reported back to clients.
    pub display_path: DisplayPathMode,

    /// Sort listings by name instead of keeping directory read order.
    pub sort_entries: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Whether symlinks may lead outside the base directory.
    /// If false, the physical location of every resolved path is checked too.
    pub allow_symlinks: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "folder-browser".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            fallback_base_dir: None,
            display_path: DisplayPathMode::Absolute,
            sort_entries: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allow_symlinks: true,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(name) = var("SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = var("LOG_LEVEL") {
            config.logging.level = level;
        }
        config.logging.with_timestamps =
            parse_flag(var("LOG_TIMESTAMPS"), config.logging.with_timestamps);

        config.storage.base_dir = var("BASE_DIR_PATH").map(PathBuf::from);
        config.storage.fallback_base_dir = var("BASE_DIR_FALLBACK").map(PathBuf::from);

        if let Some(mode) = var("DISPLAY_PATH") {
            match mode.parse() {
                Ok(mode) => config.storage.display_path = mode,
                Err(e) => warn!("{}; keeping {:?}", e, config.storage.display_path),
            }
        }
        config.storage.sort_entries = parse_flag(var("SORT_ENTRIES"), config.storage.sort_entries);

        config.security.allow_symlinks =
            parse_flag(var("ALLOW_SYMLINKS"), config.security.allow_symlinks);

        config.http = HttpConfig::from_lookup(var);

        config
    }

    /// Resolve the base directory according to the missing-base policy.
    ///
    /// `BASE_DIR_PATH` wins; `BASE_DIR_FALLBACK` is used only when it is unset.
    /// With neither, this is a configuration error.
    pub fn base_directory(&self) -> Result<BaseDirectory> {
        match (&self.storage.base_dir, &self.storage.fallback_base_dir) {
            (Some(path), _) => Ok(BaseDirectory::new(path)?),
            (None, Some(fallback)) => {
                warn!(
                    "BASE_DIR_PATH not set - falling back to configured default {:?}",
                    fallback
                );
                Ok(BaseDirectory::new(fallback)?)
            }
            (None, None) => Err(Error::config(
                "BASE_DIR_PATH is not set and no BASE_DIR_FALLBACK is configured",
            )),
        }
    }
}

/// Parse a boolean flag; anything but `false`/`0`/`no`/`off` counts as true.
pub(crate) fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => !matches!(
            v.trim().to_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        ),
        None => default,
    }
}
