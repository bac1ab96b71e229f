//! The durable preference blob: one TOML record per file.

use std::fs;
use std::path::Path;

use crate::core::UserPrefs;
use crate::fsio;

use super::StoreError;

pub(super) fn read(path: &Path) -> Result<Option<UserPrefs>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

pub(super) fn write(path: &Path, prefs: &UserPrefs) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let contents =
        toml::to_string_pretty(prefs).map_err(|source| StoreError::Serialize { source })?;
    fsio::atomic_write(path, contents.as_bytes()).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SortOrder;

    #[test]
    fn roundtrips_a_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.toml");
        let prefs = UserPrefs {
            show_completed: true,
            sort_order: SortOrder::ByDeadlineAndPriority,
            counter: 41,
        };

        write(&path, &prefs).expect("write");
        let loaded = read(&path).expect("read").expect("record present");
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn missing_blob_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(read(&dir.path().join("prefs.toml")).expect("read").is_none());
    }

    #[test]
    fn corrupt_blob_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "sort_order = 17 }{").expect("write garbage");
        assert!(matches!(
            read(&path).unwrap_err(),
            StoreError::Parse { .. }
        ));
    }
}
