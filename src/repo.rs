//! Typed façade over the preference store.
//!
//! Each operation is one atomic update whose transform reads the record it
//! is handed, never a cached copy; the returned record is the committed
//! one and doubles as the completion signal. Read paths degrade to the
//! default record instead of failing, so a storage fault never reaches
//! the display layer as an error.

use std::sync::Arc;

use crate::core::UserPrefs;
use crate::store::{PrefStore, PrefsSubscription, StoreError};

#[derive(Clone)]
pub struct PrefsRepository {
    store: Arc<PrefStore>,
}

impl PrefsRepository {
    pub fn new(store: Arc<PrefStore>) -> Self {
        Self { store }
    }

    pub fn set_show_completed(&self, completed: bool) -> Result<UserPrefs, StoreError> {
        self.store.update(|prefs| UserPrefs {
            show_completed: completed,
            ..prefs.clone()
        })
    }

    pub fn increment_counter(&self) -> Result<UserPrefs, StoreError> {
        self.store.update(|prefs| UserPrefs {
            counter: prefs.counter.saturating_add(1),
            ..prefs.clone()
        })
    }

    pub fn enable_sort_by_deadline(&self, enable: bool) -> Result<UserPrefs, StoreError> {
        self.store.update(|prefs| UserPrefs {
            sort_order: prefs.sort_order.with_deadline_sort(enable),
            ..prefs.clone()
        })
    }

    pub fn enable_sort_by_priority(&self, enable: bool) -> Result<UserPrefs, StoreError> {
        self.store.update(|prefs| UserPrefs {
            sort_order: prefs.sort_order.with_priority_sort(enable),
            ..prefs.clone()
        })
    }

    /// Current record; substitutes the default record if the store cannot
    /// be read.
    pub fn prefs(&self) -> UserPrefs {
        match self.store.read() {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!("preference read failed, substituting defaults: {err}");
                UserPrefs::default()
            }
        }
    }

    /// Live preference stream. If the store cannot take another
    /// subscriber, the caller gets a stream seeded with the default record
    /// instead of an error.
    pub fn subscribe(&self) -> PrefsSubscription {
        match self.store.subscribe() {
            Ok(subscription) => subscription,
            Err(err) => {
                tracing::warn!("preference subscription failed, substituting defaults: {err}");
                PrefsSubscription::detached(UserPrefs::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SortOrder;

    fn repo(dir: &tempfile::TempDir) -> PrefsRepository {
        let store = PrefStore::open(dir.path().join("prefs.toml"), None).expect("open");
        PrefsRepository::new(Arc::new(store))
    }

    #[test]
    fn set_show_completed_touches_only_that_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = repo(&dir);
        repo.increment_counter().expect("bump");

        let prefs = repo.set_show_completed(true).expect("set");
        assert!(prefs.show_completed);
        assert_eq!(prefs.counter, 1);
        assert_eq!(prefs.sort_order, SortOrder::Unspecified);
    }

    #[test]
    fn sequential_increments_apply_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = repo(&dir);
        repo.increment_counter().expect("first");
        let prefs = repo.increment_counter().expect("second");
        assert_eq!(prefs.counter, 2);
    }

    #[test]
    fn sort_toggles_compose_across_calls() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = repo(&dir);

        // Clear the unspecified state first, as migration normally would.
        repo.enable_sort_by_deadline(false).expect("reset");

        assert_eq!(
            repo.enable_sort_by_deadline(true).expect("deadline on").sort_order,
            SortOrder::ByDeadline
        );
        assert_eq!(
            repo.enable_sort_by_priority(true).expect("priority on").sort_order,
            SortOrder::ByDeadlineAndPriority
        );
        assert_eq!(
            repo.enable_sort_by_deadline(false).expect("deadline off").sort_order,
            SortOrder::ByPriority
        );
        assert_eq!(
            repo.enable_sort_by_priority(false).expect("priority off").sort_order,
            SortOrder::None
        );
    }

    #[test]
    fn enabling_deadline_twice_stays_by_deadline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = repo(&dir);
        repo.enable_sort_by_deadline(false).expect("reset");

        let first = repo.enable_sort_by_deadline(true).expect("first");
        let second = repo.enable_sort_by_deadline(true).expect("second");
        assert_eq!(first.sort_order, SortOrder::ByDeadline);
        assert_eq!(second.sort_order, SortOrder::ByDeadline);
    }
}
