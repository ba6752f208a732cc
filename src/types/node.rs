//! Ephemeral classification of live filesystem entries.
//!
//! No persistent tree is built; the filesystem is re-read at each walk step
//! and a `FileNode` only lives for the step that probed it.

use std::path::{Path, PathBuf};

/// What a destination or source path currently is on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    RegularFile,
    Directory,
    /// A symlink whose target resolves.
    Symlink,
    /// A symlink whose target does not resolve.
    BrokenSymlink,
    /// Nothing at this path.
    Missing,
}

impl NodeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::RegularFile => "file",
            NodeKind::Directory => "dir",
            NodeKind::Symlink => "symlink",
            NodeKind::BrokenSymlink => "broken-symlink",
            NodeKind::Missing => "missing",
        }
    }
}

/// A filesystem entry observed during a walk step.
#[derive(Clone, Debug)]
pub struct FileNode {
    pub path: PathBuf,
    pub kind: NodeKind,
}

impl FileNode {
    /// Probe `path` without following a final symlink, so broken links are
    /// distinguished from missing entries.
    pub fn probe(path: &Path) -> Self {
        let kind = match std::fs::symlink_metadata(path) {
            Err(_) => NodeKind::Missing,
            Ok(meta) => {
                if meta.file_type().is_symlink() {
                    // `exists()` follows the link; a dangling one reports false.
                    if path.exists() {
                        NodeKind::Symlink
                    } else {
                        NodeKind::BrokenSymlink
                    }
                } else if meta.is_dir() {
                    NodeKind::Directory
                } else {
                    NodeKind::RegularFile
                }
            }
        };
        FileNode {
            path: path.to_path_buf(),
            kind,
        }
    }
}
