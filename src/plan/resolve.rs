//! Fixed-point resolution of "multiple sources link the same destination".
//!
//! Each pass groups the plan's pending `CreateSymlink` operations by target.
//! A duplicate group whose first contributor is a directory is unfolded in
//! place and every other contributor re-walked one level deeper; a plain-file
//! first contributor is unresolvable and aborts the plan. Duplicates are
//! pushed one directory level deeper or eliminated on every pass and the
//! tree has finite depth, so the loop always terminates.
//!
//! Re-scanning the whole plan each pass is a deliberate
//! simplicity-over-performance choice; trees in practice are shallow.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::types::{ConflictReason, Operation, Plan, Result};

use super::walker::Walker;

/// Resolve duplicate link targets in `plan` until none remain or the plan is
/// aborted. The walker must carry the stow policy; unstow plans contain no
/// `CreateSymlink` operations and pass through untouched.
pub fn resolve(walker: &Walker<'_>, plan: &mut Plan) -> Result<()> {
    loop {
        let groups = duplicate_groups(&plan.ops);
        if groups.is_empty() {
            return Ok(());
        }

        // Compute all replacements first, then apply the removals in one
        // rebuild. Unfolding only appends, so the collected indices stay
        // valid for the whole pass.
        let mut superseded: Vec<usize> = Vec::new();
        for (target, indices) in &groups {
            let sources: Vec<PathBuf> = indices
                .iter()
                .filter_map(|&i| match &plan.ops[i] {
                    Operation::CreateSymlink { source, .. } => Some(source.clone()),
                    _ => None,
                })
                .collect();

            if sources[0].is_dir() {
                // First contributor wins the unfold; the rest land their
                // entries individually inside the now-real directory.
                walker.unfold(&sources[0], target, plan)?;
                for source in &sources[1..] {
                    walker.walk(source, target, true, plan)?;
                }
                superseded.extend_from_slice(&indices[1..]);
            } else {
                walker.report_conflict(plan, ConflictReason::AnotherSource, sources[0].clone());
                return Ok(());
            }
        }

        superseded.sort_unstable();
        let old = std::mem::take(&mut plan.ops);
        plan.ops = old
            .into_iter()
            .enumerate()
            .filter(|(i, _)| superseded.binary_search(i).is_err())
            .map(|(_, op)| op)
            .collect();
    }
}

/// Map target path → indices of all `CreateSymlink` operations aiming at it,
/// keeping only targets with more than one contributor. BTreeMap keeps group
/// order deterministic.
fn duplicate_groups(ops: &[Operation]) -> Vec<(PathBuf, Vec<usize>)> {
    let mut tally: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
    for (i, op) in ops.iter().enumerate() {
        if let Operation::CreateSymlink { target, .. } = op {
            tally.entry(target.clone()).or_default().push(i);
        }
    }
    tally.into_iter().filter(|(_, v)| v.len() > 1).collect()
}
