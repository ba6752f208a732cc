//! Recursive comparator that yields the operations needed to make a
//! destination directory reflect a source directory's entries.
//!
//! The walker never touches the filesystem; it only reads it. All decisions
//! come from the supplied `EntryPolicy`, so the same walk drives both stow
//! and unstow. Conflicts are recorded on the plan and reported through the
//! audit sink; siblings keep being processed so one pass reports every
//! conflict in a directory.

use std::path::{Path, PathBuf};

use log::Level;

use crate::fs::inspect;
use crate::logging::AuditSink;
use crate::policy::{EntryAction, EntryPolicy, TargetState};
use crate::types::{Conflict, ConflictReason, Error, FileNode, NodeKind, Operation, Plan, Result};

pub struct Walker<'a> {
    policy: &'a dyn EntryPolicy,
    audit: &'a dyn AuditSink,
}

impl<'a> Walker<'a> {
    pub fn new(policy: &'a dyn EntryPolicy, audit: &'a dyn AuditSink) -> Self {
        Self { policy, audit }
    }

    /// Append to `plan` the operations needed so `dest` reflects the direct
    /// children of `source`. `unfolding` is true while re-walking a subtree
    /// whose parent link is pending removal (see [`Walker::unfold`]).
    pub fn walk(&self, source: &Path, dest: &Path, unfolding: bool, plan: &mut Plan) -> Result<()> {
        for entry in inspect::dir_entries_sorted(source)? {
            let Some(name) = entry.file_name() else {
                continue;
            };
            let target = dest.join(name);
            match self.policy.decide(classify(&entry, &target), unfolding) {
                EntryAction::Link => plan.push(Operation::CreateSymlink {
                    source: entry,
                    target,
                }),
                EntryAction::NoteLinked => plan.push(Operation::AlreadyLinked {
                    source: entry,
                    target,
                }),
                EntryAction::Unlink => plan.push(Operation::RemoveLink { target }),
                EntryAction::Recurse => self.walk(&entry, &target, false, plan)?,
                EntryAction::UnfoldThenRecurse => {
                    let resolved = std::fs::canonicalize(&target)
                        .map_err(|e| Error::Io(format!("resolve '{}': {e}", target.display())))?;
                    self.unfold(&resolved, &target, plan)?;
                    self.walk(&entry, &target, false, plan)?;
                }
                EntryAction::Conflict(reason) => {
                    // The missing-parent message names the absent directory,
                    // not the entry that would have landed inside it.
                    let at = if reason == ConflictReason::NoSuchDirectory {
                        target.parent().unwrap_or(&target).to_path_buf()
                    } else {
                        target
                    };
                    self.report_conflict(plan, reason, at);
                }
                EntryAction::Skip => {}
            }
        }
        Ok(())
    }

    /// Convert a destination entry that is currently a single symlink to an
    /// entire source subtree into a real directory containing individual
    /// links to that subtree's entries.
    ///
    /// Appends `RemoveLink(target)` then `CreateDirectory(target)`, then
    /// re-walks `source` into `target` with unfolding=true. Idempotent: once
    /// unfolded, the target is a real directory and the unfold guard in the
    /// policy no longer triggers.
    pub fn unfold(&self, source: &Path, target: &Path, plan: &mut Plan) -> Result<()> {
        plan.push(Operation::RemoveLink {
            target: target.to_path_buf(),
        });
        plan.push(Operation::CreateDirectory {
            target: target.to_path_buf(),
        });
        self.walk(source, target, true, plan)
    }

    pub(crate) fn report_conflict(&self, plan: &mut Plan, reason: ConflictReason, path: PathBuf) {
        let conflict = Conflict::new(self.policy.verb(), reason, path);
        let level = if self.policy.fatal_conflicts() {
            Level::Error
        } else {
            Level::Warn
        };
        self.audit.log(level, &conflict.message);
        if self.policy.fatal_conflicts() {
            plan.aborted = true;
        }
        plan.conflicts.push(conflict);
    }
}

/// Compare one source entry against its would-be target on the live
/// filesystem.
fn classify(entry: &Path, target: &Path) -> TargetState {
    let node = FileNode::probe(target);
    match node.kind {
        NodeKind::Missing => {
            if target.parent().is_some_and(Path::exists) {
                TargetState::Vacant
            } else {
                TargetState::MissingParent
            }
        }
        NodeKind::BrokenSymlink => TargetState::BrokenLink,
        kind => {
            if inspect::same_file(entry, target) {
                TargetState::SameFile
            } else if target.is_dir() && entry.is_dir() {
                TargetState::BothDirs {
                    via_symlink: kind == NodeKind::Symlink,
                }
            } else {
                TargetState::Occupied
            }
        }
    }
}
