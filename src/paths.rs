//! XDG directory helpers for config/data locations.

use std::path::PathBuf;

/// Base directory for durable data (preference blob, logs).
///
/// Uses `TP_DATA_DIR` if set, otherwise `$XDG_DATA_HOME/taskprefs` or
/// `~/.local/share/taskprefs`.
pub(crate) fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TP_DATA_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }

    std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".local")
                .join("share")
        })
        .join("taskprefs")
}

/// Base directory for configuration.
///
/// Uses `TP_CONFIG_DIR` if set, otherwise `$XDG_CONFIG_HOME/taskprefs` or
/// `~/.config/taskprefs`.
pub(crate) fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TP_CONFIG_DIR")
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }

    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join(".config")
        })
        .join("taskprefs")
}

pub(crate) fn log_dir() -> PathBuf {
    data_dir().join("logs")
}
