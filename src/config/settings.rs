//! Application settings and configuration types.
//!
//! Settings are persisted to `~/.config/heap/settings.json` (or the
//! platform equivalent) and loaded at startup. A missing file means
//! defaults.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::MIN_ACTIONS_FOR_RULE;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "panbanda";
const APPLICATION: &str = "heap";

/// Errors that can occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine platform directories")]
    MissingDirectories,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rule learning configuration.
    pub triage: TriageSettings,
    /// Local storage configuration.
    pub storage: StorageSettings,
}

impl Settings {
    /// Default location of the settings file.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("settings.json"))
    }

    /// Loads settings from `path`, falling back to defaults if it does not
    /// exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes settings to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolves the database path, defaulting to the platform data
    /// directory.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.storage.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join("triage.db")),
        }
    }
}

/// Rule learning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageSettings {
    /// Whether rules are suggested at all.
    pub enabled: bool,
    /// Unanimous actions needed from one sender before suggesting a rule.
    pub min_actions_for_rule: usize,
}

impl Default for TriageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_actions_for_rule: MIN_ACTIONS_FOR_RULE,
        }
    }
}

/// Local storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Override for the SQLite database location.
    pub database_path: Option<PathBuf>,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or(ConfigError::MissingDirectories)
}
