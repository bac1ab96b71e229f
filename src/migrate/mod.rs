//! One-time migration from the legacy flat key-value preference store.
//!
//! The legacy store predates the structured record and held a single
//! relevant key, `sort_order`. Migration runs when the structured record
//! still reports `unspecified` and rewrites only that field.

mod legacy;

pub use legacy::{
    LegacyPrefsFile, LegacySource, MigrateError, SORT_ORDER_KEY, migrate_sort_order,
};
