//! Shared crate-wide constants for Linkfarm.
//!
//! Centralizes magic values and default labels used across modules.

/// Tool name used as the prefix of user-facing conflict messages and as the
/// subsystem tag on emitted facts, e.g. `linkfarm stow: can not stow '...'`.
pub const TOOL_NAME: &str = "linkfarm";

/// UUIDv5 namespace tag for deterministic plan/operation IDs.
pub const NS_TAG: &str = "https://linkfarm/plan";
