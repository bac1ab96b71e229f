//! Legacy flat preference file and the sort-order migration step.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::core::{InvalidSortOrder, SortOrder, UserPrefs};

/// Key under which the legacy store kept the task ordering.
pub const SORT_ORDER_KEY: &str = "sort_order";

/// Read-only view of the legacy flat key-value store.
pub trait LegacySource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Legacy `key=value` preference file.
///
/// One entry per line; blank lines and `#` comments are skipped. A missing
/// file loads as an empty store.
#[derive(Debug, Clone, Default)]
pub struct LegacyPrefsFile {
    entries: BTreeMap<String, String>,
}

impl LegacyPrefsFile {
    pub fn load(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LegacySource for LegacyPrefsFile {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Migration failure. Never swallowed: callers decide between refusing to
/// open and falling back, but the malformed value is always surfaced.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    InvalidSortOrder(#[from] InvalidSortOrder),
}

/// Fold the legacy ordering into a structured record that has never had
/// one.
///
/// Returns `Ok(None)` when the record's ordering is already set; the
/// migration is then a no-op. An absent legacy key means the legacy store
/// never customized the ordering and maps to `none`. Only `sort_order`
/// changes; every other field is carried over untouched.
pub fn migrate_sort_order(
    prefs: &UserPrefs,
    legacy: &dyn LegacySource,
) -> Result<Option<UserPrefs>, MigrateError> {
    if prefs.sort_order != SortOrder::Unspecified {
        return Ok(None);
    }

    let raw = legacy
        .get(SORT_ORDER_KEY)
        .unwrap_or_else(|| "none".to_string());
    let sort_order = SortOrder::parse(&raw)?;

    Ok(Some(UserPrefs {
        sort_order,
        ..prefs.clone()
    }))
}
