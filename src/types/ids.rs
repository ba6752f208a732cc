//! Deterministic UUIDv5 identifiers for plans and operations.
//!
//! The UUID namespace is derived from a stable tag (`NS_TAG`) so that
//! `plan_id` and `op_id` are reproducible across runs for the same
//! serialized operation sequence.
use std::fmt::Write;

use uuid::Uuid;

use super::plan::{Operation, Plan};
use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Serialize an operation into a stable, human-readable string used for
/// UUIDv5 input.
fn serialize_op(op: &Operation) -> String {
    match op {
        Operation::CreateSymlink { source, target } => {
            format!("L:{}->{}", source.display(), target.display())
        }
        Operation::RemoveLink { target } => format!("U:{}", target.display()),
        Operation::CreateDirectory { target } => format!("D:{}", target.display()),
        Operation::AlreadyLinked { source, target } => {
            format!("A:{}->{}", source.display(), target.display())
        }
    }
}

/// Compute a deterministic UUIDv5 for a plan by serializing operations in
/// order. Two plans with identical operation sequences (including ordering)
/// have the same `plan_id`.
#[must_use]
pub fn plan_id(plan: &Plan) -> Uuid {
    let ns = namespace();
    let mut s = String::new();
    for op in &plan.ops {
        s.push_str(&serialize_op(op));
        s.push('\n');
    }
    Uuid::new_v5(&ns, s.as_bytes())
}

/// Compute a deterministic UUIDv5 for an operation as a function of the plan
/// ID and the operation's serialized form, including its position.
#[must_use]
pub fn op_id(plan_id: &Uuid, op: &Operation, idx: usize) -> Uuid {
    let mut s = serialize_op(op);
    let _ = write!(s, "#{idx}");
    Uuid::new_v5(plan_id, s.as_bytes())
}
