//! Mutating primitives applied by the executor. Each either fully succeeds
//! or returns the io error; there is no per-operation retry at this layer.

use std::path::Path;

pub fn create_symlink(source: &Path, target: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

/// Remove a symlink (or file) at `target`. Does not follow the link.
pub fn remove_link(target: &Path) -> std::io::Result<()> {
    std::fs::remove_file(target)
}

pub fn create_directory(target: &Path) -> std::io::Result<()> {
    std::fs::create_dir(target)
}
