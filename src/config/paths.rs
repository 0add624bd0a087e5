//! Path management for warikan
//!
//! Provides XDG-compliant path resolution for configuration, data and the
//! audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `WARIKAN_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/warikan` or `~/.config/warikan`
//! 3. Windows: `%APPDATA%\warikan`

use std::path::PathBuf;

use crate::error::WarikanError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "WARIKAN_DATA_DIR";

/// Manages all paths used by warikan
#[derive(Debug, Clone)]
pub struct WarikanPaths {
    base_dir: PathBuf,
}

impl WarikanPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, WarikanError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create WarikanPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one JSON file per collection
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Path of a named collection file, e.g. `data/expenses.json`
    pub fn collection_file(&self, collection: &str) -> PathBuf {
        self.data_dir().join(format!("{}.json", collection))
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), WarikanError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| WarikanError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| WarikanError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if warikan has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, WarikanError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                WarikanError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("warikan"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, WarikanError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| WarikanError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("warikan"))
}
