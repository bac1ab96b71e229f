#![forbid(unsafe_code)]

//! Reactive task-preference store.
//!
//! One structured preference record per store, persisted as a single blob
//! and replaced wholesale on every commit. The record is exposed as a live
//! stream, legacy flat key-value preferences are folded in the first time a
//! store opens, and task lists are filtered/ordered under the current
//! preferences into a derived view stream.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
mod fsio;
pub mod migrate;
mod paths;
pub mod repo;
pub mod store;
pub mod stream;
pub mod telemetry;
pub mod view;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

// Re-export the main surface at crate root for convenience
pub use crate::core::{SortOrder, Task, UserPrefs};
pub use crate::repo::PrefsRepository;
pub use crate::store::PrefStore;
pub use crate::view::{TasksUiModel, UiFeed, derive_task_list};
