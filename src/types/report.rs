use std::path::PathBuf;

use serde::Serialize;

use super::plan::Operation;
use crate::constants::TOOL_NAME;

/// Why a requested link or directory operation cannot be applied
/// unambiguously at its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    NoSuchDirectory,
    ExistingFile,
    AnotherSource,
    BrokenLink,
    InsufficientPermissions,
}

impl ConflictReason {
    /// Compatibility wording; these phrases are part of the reporting surface.
    pub const fn as_str(self) -> &'static str {
        match self {
            ConflictReason::NoSuchDirectory => "No such directory",
            ConflictReason::ExistingFile => "Conflicts with existing file",
            ConflictReason::AnotherSource => "Conflicts with another source",
            ConflictReason::BrokenLink => "Conflicts with a broken link",
            ConflictReason::InsufficientPermissions => "Insufficient permissions",
        }
    }
}

/// A recorded planning conflict. Conflicts are accumulated and reported as a
/// batch so the user sees every problem in a directory, not just the first.
#[derive(Clone, Debug, Serialize)]
pub struct Conflict {
    pub path: PathBuf,
    pub reason: ConflictReason,
    pub message: String,
}

impl Conflict {
    pub fn new(verb: &str, reason: ConflictReason, path: PathBuf) -> Self {
        let message = conflict_message(verb, reason, &path);
        Conflict {
            path,
            reason,
            message,
        }
    }
}

/// Render the user-facing line for a conflict:
/// `<tool> <verb>: can not <verb> '<path>': <reason>`.
///
/// The stow missing-parent case reads `can not stow into '<dir>'` to match
/// the original tool's wording.
pub fn conflict_message(verb: &str, reason: ConflictReason, path: &std::path::Path) -> String {
    match (verb, reason) {
        ("stow", ConflictReason::NoSuchDirectory) => format!(
            "{TOOL_NAME} stow: can not stow into '{}': {}",
            path.display(),
            reason.as_str()
        ),
        _ => format!(
            "{TOOL_NAME} {verb}: can not {verb} '{}': {}",
            path.display(),
            reason.as_str()
        ),
    }
}

/// Outcome of applying a plan. `errors` is non-empty when a filesystem
/// primitive failed; operations after the failure were not attempted.
#[derive(Clone, Debug, Default)]
pub struct ApplyReport {
    pub executed: Vec<Operation>,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}
