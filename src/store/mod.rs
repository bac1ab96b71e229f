//! Durable preference store.
//!
//! One structured record per store, persisted as a single blob and
//! replaced wholesale on every commit. Reads after open are served from
//! memory; the filesystem is touched only by commits. The commit lock is
//! the sole serialization point for mutation.

mod blob;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

use crate::core::{SortOrder, UserPrefs};
use crate::migrate::{self, LegacySource, MigrateError};
use crate::stream::{Broadcaster, StreamError, StreamLimits, Subscription};

/// Live preference stream handle.
pub type PrefsSubscription = Subscription<UserPrefs>;

#[derive(Debug, Error)]
pub enum StoreError {
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
        source: toml::de::Error,
    },
    #[error("failed to render preference record: {source}")]
    Serialize {
        #[source]
        source: toml::ser::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store lock poisoned")]
    LockPoisoned,
    #[error(transparent)]
    Stream(#[from] StreamError),
}

pub struct PrefStore {
    inner: Mutex<StoreInner>,
    broadcaster: Broadcaster<UserPrefs>,
}

struct StoreInner {
    path: PathBuf,
    current: UserPrefs,
    revision: u64,
}

impl PrefStore {
    /// Open the store at `path`, substituting defaults for a missing or
    /// unreadable blob and folding in the legacy ordering if the record
    /// has never been migrated.
    ///
    /// A malformed legacy value is logged and falls back to `none` rather
    /// than refusing to open; see [`migrate::migrate_sort_order`] for the
    /// strict path. The migrated record is persisted before the store
    /// becomes observable, so migration runs exactly once.
    pub fn open(
        path: impl Into<PathBuf>,
        legacy: Option<&dyn LegacySource>,
    ) -> Result<Self, StoreError> {
        Self::open_with_limits(path, legacy, StreamLimits::default())
    }

    pub fn open_with_limits(
        path: impl Into<PathBuf>,
        legacy: Option<&dyn LegacySource>,
        limits: StreamLimits,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let loaded = match blob::read(&path) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => UserPrefs::default(),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    "preference read failed, substituting defaults: {err}"
                );
                UserPrefs::default()
            }
        };

        let current = match legacy {
            Some(source) => Self::migrated(&path, loaded, source)?,
            None => loaded,
        };

        Ok(Self {
            inner: Mutex::new(StoreInner {
                path,
                current,
                revision: 0,
            }),
            broadcaster: Broadcaster::new(limits),
        })
    }

    fn migrated(
        path: &Path,
        loaded: UserPrefs,
        legacy: &dyn LegacySource,
    ) -> Result<UserPrefs, StoreError> {
        match migrate::migrate_sort_order(&loaded, legacy) {
            Ok(Some(migrated)) => {
                blob::write(path, &migrated)?;
                tracing::info!(
                    sort_order = migrated.sort_order.as_str(),
                    "migrated legacy sort order"
                );
                Ok(migrated)
            }
            Ok(None) => Ok(loaded),
            Err(err @ MigrateError::InvalidSortOrder(_)) => {
                tracing::warn!("legacy sort order unusable, falling back to `none`: {err}");
                let fallback = UserPrefs {
                    sort_order: SortOrder::None,
                    ..loaded
                };
                blob::write(path, &fallback)?;
                Ok(fallback)
            }
        }
    }

    /// Point-in-time copy of the current record.
    pub fn read(&self) -> Result<UserPrefs, StoreError> {
        Ok(self.lock()?.current.clone())
    }

    /// Atomic read-modify-write.
    ///
    /// The transform runs outside the commit lock against a snapshot; if
    /// another commit lands in between, the transform is re-run against
    /// the fresh record, so no update is ever lost. A transform that
    /// returns a record equal to the current one commits as a no-op:
    /// nothing is written and nothing is emitted. A failed write leaves
    /// the record untouched and surfaces only to this caller.
    pub fn update<F>(&self, mut transform: F) -> Result<UserPrefs, StoreError>
    where
        F: FnMut(&UserPrefs) -> UserPrefs,
    {
        loop {
            let (seen, snapshot) = {
                let guard = self.lock()?;
                (guard.revision, guard.current.clone())
            };
            let next = transform(&snapshot);

            let mut guard = self.lock()?;
            if guard.revision != seen {
                // Lost the race; re-run the transform on the fresh record.
                continue;
            }
            if next == guard.current {
                return Ok(next);
            }

            blob::write(&guard.path, &next)?;
            guard.current = next.clone();
            guard.revision = guard.revision.saturating_add(1);
            // Publishing under the commit lock keeps emission order equal
            // to commit order.
            self.broadcaster.publish(next.clone())?;
            return Ok(next);
        }
    }

    /// Subscribe to the record stream: the current record immediately,
    /// then every committed record in commit order.
    pub fn subscribe(&self) -> Result<PrefsSubscription, StoreError> {
        let guard = self.lock()?;
        let subscription = self.broadcaster.subscribe_with_seed(guard.current.clone())?;
        Ok(subscription)
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("prefs.toml")
    }

    #[test]
    fn fresh_store_serves_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PrefStore::open(store_path(&dir), None).expect("open");
        assert_eq!(store.read().expect("read"), UserPrefs::default());
    }

    #[test]
    fn corrupt_blob_degrades_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = store_path(&dir);
        fs::write(&path, "not a record {{{{").expect("write garbage");

        let store = PrefStore::open(&path, None).expect("open");
        assert_eq!(store.read().expect("read"), UserPrefs::default());
    }

    #[test]
    fn update_returns_and_persists_the_new_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = store_path(&dir);
        let store = PrefStore::open(&path, None).expect("open");

        let committed = store
            .update(|prefs| UserPrefs {
                counter: prefs.counter + 1,
                ..prefs.clone()
            })
            .expect("update");
        assert_eq!(committed.counter, 1);

        let reopened = PrefStore::open(&path, None).expect("reopen");
        assert_eq!(reopened.read().expect("read").counter, 1);
    }

    #[test]
    fn subscription_sees_seed_then_commits_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PrefStore::open(store_path(&dir), None).expect("open");
        let sub = store.subscribe().expect("subscribe");

        assert_eq!(sub.recv().expect("seed"), UserPrefs::default());

        for _ in 0..3 {
            store
                .update(|prefs| UserPrefs {
                    counter: prefs.counter + 1,
                    ..prefs.clone()
                })
                .expect("update");
        }
        assert_eq!(sub.recv().expect("first").counter, 1);
        assert_eq!(sub.recv().expect("second").counter, 2);
        assert_eq!(sub.recv().expect("third").counter, 3);
    }

    #[test]
    fn unchanged_update_commits_as_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PrefStore::open(store_path(&dir), None).expect("open");
        let sub = store.subscribe().expect("subscribe");
        assert_eq!(sub.recv().expect("seed"), UserPrefs::default());

        store.update(|prefs| prefs.clone()).expect("no-op update");
        store
            .update(|prefs| UserPrefs {
                show_completed: true,
                ..prefs.clone()
            })
            .expect("real update");

        // The no-op emitted nothing; the next value is the real commit.
        let next = sub.recv().expect("commit");
        assert!(next.show_completed);
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn migration_is_skipped_without_a_legacy_source() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PrefStore::open(store_path(&dir), None).expect("open");
        assert_eq!(
            store.read().expect("read").sort_order,
            SortOrder::Unspecified
        );
    }
}
