//! Path management for Backoffice
//!
//! ## Path Resolution Order
//!
//! 1. `BACKOFFICE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/backoffice` or `~/.config/backoffice`
//! 3. Windows: `%APPDATA%\backoffice`

use std::path::PathBuf;

use crate::error::BackofficeError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BACKOFFICE_DATA_DIR";

/// Manages all paths used by Backoffice
#[derive(Debug, Clone)]
pub struct BackofficePaths {
    base_dir: PathBuf,
}

impl BackofficePaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home/config directory can be determined.
    pub fn new() -> Result<Self, BackofficeError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one JSON snapshot per collection
    pub fn collections_dir(&self) -> PathBuf {
        self.base_dir.join("collections")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Snapshot file for a named collection
    pub fn collection_file(&self, name: &str) -> PathBuf {
        self.collections_dir().join(format!("{}.json", name))
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), BackofficeError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BackofficeError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.collections_dir()).map_err(|e| {
            BackofficeError::Io(format!("Failed to create collections directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if Backoffice has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BackofficeError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                BackofficeError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("backoffice"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BackofficeError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BackofficeError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("backoffice"))
}
