//! Task entities consumed from the external task source.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single task as published by the task source.
///
/// Tasks are read-only here: this crate filters and orders them, it never
/// mutates or persists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// Deadline as wall-clock epoch milliseconds.
    pub deadline_ms: u64,
    /// Lower value = more urgent.
    pub priority: u8,
}

/// Task-list file could not be loaded.
#[derive(Debug, Error)]
pub enum TaskLoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a JSON array of tasks.
pub fn tasks_from_json(raw: &str) -> serde_json::Result<Vec<Task>> {
    serde_json::from_str(raw)
}

/// Load a JSON task-list file.
pub fn load_tasks_file(path: &Path) -> Result<Vec<Task>, TaskLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| TaskLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tasks_from_json(&contents).map_err(|source| TaskLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
