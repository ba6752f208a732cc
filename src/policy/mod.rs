//! Per-entry walk policy.
//!
//! The tree walker is one algorithm parameterized by a small policy trait
//! with two implementations: the stow policy (create links, conflicts are
//! fatal) and the unstow policy (remove links, conflicts are logged only,
//! since removing links is inherently less destructive than creating them).

use crate::types::ConflictReason;

/// What the walker observed at `destination / entry.name`, relative to the
/// source entry being considered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetState {
    /// Target resolves to the same underlying file as the source entry.
    SameFile,
    /// Target and source entry are both directories.
    BothDirs {
        /// Target is itself a symlink (a prior whole-directory stow).
        via_symlink: bool,
    },
    /// Target exists and is neither same-file nor a compatible directory.
    Occupied,
    /// Target is a symlink that does not resolve.
    BrokenLink,
    /// Target is absent and so is its parent directory.
    MissingParent,
    /// Target is absent; its parent exists.
    Vacant,
}

/// What the walker should do for one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryAction {
    /// Emit `CreateSymlink(entry, target)`.
    Link,
    /// Emit `AlreadyLinked(entry, target)`.
    NoteLinked,
    /// Emit `RemoveLink(target)`.
    Unlink,
    /// Walk into the entry/target directory pair.
    Recurse,
    /// Unfold the target symlink into a real directory first, then recurse.
    UnfoldThenRecurse,
    /// Record a conflict; fatality is the policy's call.
    Conflict(ConflictReason),
    Skip,
}

pub trait EntryPolicy {
    /// Verb used in user-facing messages ("stow" or "unstow").
    fn verb(&self) -> &'static str;

    /// Whether a recorded conflict aborts the whole plan.
    fn fatal_conflicts(&self) -> bool;

    fn decide(&self, state: TargetState, unfolding: bool) -> EntryAction;
}

/// Link-creating policy. Any conflict dooms the plan; siblings are still
/// walked so all conflicts are reported in one batch.
pub struct StowPolicy;

impl EntryPolicy for StowPolicy {
    fn verb(&self) -> &'static str {
        "stow"
    }

    fn fatal_conflicts(&self) -> bool {
        true
    }

    fn decide(&self, state: TargetState, unfolding: bool) -> EntryAction {
        match state {
            // While unfolding, the parent link was just removed, so the
            // matching link must be re-created explicitly.
            TargetState::SameFile if unfolding => EntryAction::Link,
            TargetState::SameFile => EntryAction::NoteLinked,
            TargetState::BothDirs { via_symlink: true } => EntryAction::UnfoldThenRecurse,
            TargetState::BothDirs { via_symlink: false } => EntryAction::Recurse,
            TargetState::Occupied => EntryAction::Conflict(ConflictReason::ExistingFile),
            TargetState::BrokenLink => EntryAction::Conflict(ConflictReason::BrokenLink),
            // A missing parent is fine mid-unfold: the pending
            // CreateDirectory supplies it before this link runs.
            TargetState::MissingParent if unfolding => EntryAction::Link,
            TargetState::MissingParent => EntryAction::Conflict(ConflictReason::NoSuchDirectory),
            TargetState::Vacant => EntryAction::Link,
        }
    }
}

/// Link-removing policy. Mismatches are reported but never abort the run.
pub struct UnstowPolicy;

impl EntryPolicy for UnstowPolicy {
    fn verb(&self) -> &'static str {
        "unstow"
    }

    fn fatal_conflicts(&self) -> bool {
        false
    }

    fn decide(&self, state: TargetState, _unfolding: bool) -> EntryAction {
        match state {
            TargetState::SameFile => EntryAction::Unlink,
            TargetState::BothDirs { via_symlink: false } => EntryAction::Recurse,
            // A symlinked directory that is not same-file belongs to another
            // source; leave it alone.
            TargetState::BothDirs { via_symlink: true } => EntryAction::Skip,
            TargetState::Occupied => EntryAction::Conflict(ConflictReason::ExistingFile),
            TargetState::BrokenLink => EntryAction::Conflict(ConflictReason::BrokenLink),
            TargetState::MissingParent => EntryAction::Conflict(ConflictReason::NoSuchDirectory),
            TargetState::Vacant => EntryAction::Skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stow_same_file_depends_on_unfolding() {
        let p = StowPolicy;
        assert_eq!(p.decide(TargetState::SameFile, false), EntryAction::NoteLinked);
        assert_eq!(p.decide(TargetState::SameFile, true), EntryAction::Link);
    }

    #[test]
    fn stow_unfolds_symlinked_directories() {
        let p = StowPolicy;
        assert_eq!(
            p.decide(TargetState::BothDirs { via_symlink: true }, false),
            EntryAction::UnfoldThenRecurse
        );
        assert_eq!(
            p.decide(TargetState::BothDirs { via_symlink: false }, false),
            EntryAction::Recurse
        );
    }

    #[test]
    fn stow_missing_parent_is_fatal_only_outside_unfold() {
        let p = StowPolicy;
        assert_eq!(
            p.decide(TargetState::MissingParent, false),
            EntryAction::Conflict(ConflictReason::NoSuchDirectory)
        );
        assert_eq!(p.decide(TargetState::MissingParent, true), EntryAction::Link);
        assert!(p.fatal_conflicts());
    }

    #[test]
    fn unstow_is_permissive() {
        let p = UnstowPolicy;
        assert_eq!(p.decide(TargetState::SameFile, false), EntryAction::Unlink);
        assert_eq!(
            p.decide(TargetState::BothDirs { via_symlink: true }, false),
            EntryAction::Skip
        );
        assert_eq!(
            p.decide(TargetState::Occupied, false),
            EntryAction::Conflict(ConflictReason::ExistingFile)
        );
        assert_eq!(
            p.decide(TargetState::BrokenLink, false),
            EntryAction::Conflict(ConflictReason::BrokenLink)
        );
        assert_eq!(
            p.decide(TargetState::MissingParent, false),
            EntryAction::Conflict(ConflictReason::NoSuchDirectory)
        );
        assert!(!p.fatal_conflicts());
    }
}
