//! Atomic whole-file replacement.

use std::fs;
use std::io;
use std::path::Path;

/// Write `data` to `path` via a sibling temp file and rename, so readers
/// see either the old contents or the new ones, never a partial write.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::other("path has no parent directory"))?;
    let temp = tempfile::NamedTempFile::new_in(dir)?;
    fs::write(temp.path(), data)?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
