//! Read-only inspection helpers: same-file comparison, sorted directory
//! listing, and the unix permission probes used by `link`.

use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use crate::types::{Error, Result};

/// True when both paths resolve to the same underlying file (device and
/// inode match after following symlinks). Errors on either side read as
/// "not the same file".
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

/// Direct children of `dir`, sorted by file name for deterministic plans.
pub fn dir_entries_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let rd = std::fs::read_dir(dir)
        .map_err(|e| Error::Io(format!("read_dir '{}': {e}", dir.display())))?;
    let mut entries: Vec<PathBuf> = Vec::new();
    for entry in rd {
        let entry =
            entry.map_err(|e| Error::Io(format!("read_dir '{}': {e}", dir.display())))?;
        entries.push(entry.path());
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

/// Owner-read bit check. Mode-bit based rather than an open(2) probe so the
/// answer does not depend on the calling euid.
pub fn is_readable(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| m.permissions().mode() & 0o400 != 0)
        .unwrap_or(false)
}

/// Owner-write bit check for a directory we intend to create entries in.
pub fn is_writable(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| m.permissions().mode() & 0o200 != 0)
        .unwrap_or(false)
}
