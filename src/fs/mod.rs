//! Filesystem collaborators: inspection utilities used by the planner and
//! the mutating primitives applied by the executor.

pub mod inspect;
pub mod ops;
