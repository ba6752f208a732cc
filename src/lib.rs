#![forbid(unsafe_code)]
//! Linkfarm: a symlink-farm manager.
//!
//! Reconciles one or more source directory trees into a destination tree by
//! creating symbolic links, so the destination appears to contain merged
//! copies of the sources without duplicating files. The inverse (unstow)
//! removes previously created links.
//!
//! Model highlights:
//! - Strict plan-then-commit: all walking and conflict resolution completes
//!   before any mutating operation runs; an aborted plan is never executed.
//! - A directory stowed as a single symlink is transparently "unfolded" into
//!   a real directory plus per-entry links when a second source needs to
//!   contribute entries to the same subtree.
//! - Conflict detection runs to a fixed point over the accumulated plan, so
//!   no two pending links in a finalized plan target the same destination.

pub mod api;
pub mod constants;
pub mod fs;
pub mod logging;
pub mod plan;
pub mod policy;
pub mod types;

pub use api::*;
