use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths;

/// Name of the preference blob inside the data directory.
const PREFS_FILE: &str = "prefs.toml";

/// Name of the legacy flat preference file inside the data directory.
const LEGACY_FILE: &str = "legacy_prefs";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub stdout: bool,
    pub stdout_format: LogFormat,
    pub filter: Option<String>,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            stdout_format: LogFormat::Compact,
            filter: None,
            file: FileLoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub rotation: LogRotation,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: None,
            format: LogFormat::Json,
            rotation: LogRotation::Daily,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Overrides the XDG data dir for the preference blob.
    pub data_dir: Option<PathBuf>,
    /// Location of the legacy flat preference file consulted during
    /// migration.
    pub legacy_file: Option<PathBuf>,
}

impl StoreConfig {
    fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::data_dir)
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.resolved_data_dir().join(PREFS_FILE)
    }

    pub fn legacy_path(&self) -> PathBuf {
        self.legacy_file
            .clone()
            .unwrap_or_else(|| self.resolved_data_dir().join(LEGACY_FILE))
    }
}
