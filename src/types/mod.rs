pub mod errors;
pub mod ids;
pub mod node;
pub mod plan;
pub mod report;

pub use errors::{Error, Result};
pub use node::{FileNode, NodeKind};
pub use plan::{ApplyMode, Operation, Plan};
pub use report::{ApplyReport, Conflict, ConflictReason};
