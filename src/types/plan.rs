use std::path::{Path, PathBuf};

use serde::Serialize;

use super::report::Conflict;

#[derive(Clone, Debug)]
pub enum ApplyMode {
    DryRun,
    Commit,
}

impl Default for ApplyMode {
    fn default() -> Self {
        ApplyMode::DryRun
    }
}

/// An immutable description of one filesystem action. Identity is structural:
/// two operations with equal fields are the same operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateSymlink { source: PathBuf, target: PathBuf },
    RemoveLink { target: PathBuf },
    CreateDirectory { target: PathBuf },
    /// The target already resolves to the source; nothing to do.
    AlreadyLinked { source: PathBuf, target: PathBuf },
}

impl Operation {
    pub fn target(&self) -> &Path {
        match self {
            Operation::CreateSymlink { target, .. }
            | Operation::RemoveLink { target }
            | Operation::CreateDirectory { target }
            | Operation::AlreadyLinked { target, .. } => target,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Operation::CreateSymlink { .. } => "create_symlink",
            Operation::RemoveLink { .. } => "remove_link",
            Operation::CreateDirectory { .. } => "create_directory",
            Operation::AlreadyLinked { .. } => "already_linked",
        }
    }

    /// True for operations that touch the filesystem when applied.
    pub const fn is_mutating(&self) -> bool {
        !matches!(self, Operation::AlreadyLinked { .. })
    }
}

/// An ordered sequence of operations plus everything the walk and the
/// resolver learned about conflicts. Owned by one stow/unstow invocation and
/// consumed once; a plan is never re-used after apply.
#[derive(Clone, Debug, Default)]
pub struct Plan {
    pub ops: Vec<Operation>,
    pub conflicts: Vec<Conflict>,
    /// Once set, the plan must never be executed.
    pub aborted: bool,
}

impl Plan {
    pub(crate) fn push(&mut self, op: Operation) {
        self.ops.push(op);
    }

    /// True when the plan contains no mutating operations (e.g. re-stowing an
    /// already stowed source yields only `AlreadyLinked` entries).
    pub fn is_noop(&self) -> bool {
        self.ops.iter().all(|op| !op.is_mutating())
    }
}
