//! Apply stage: executes plan operations strictly in list order.
//!
//! Ordering matters: a RemoveLink + CreateDirectory pair from an unfold must
//! run before any operation that lands inside that now-real directory.
//!
//! Side-effects:
//! - Emits facts for `apply.attempt` and `apply.result` per operation, plus
//!   an `apply.summary`.
//! - Refuses an aborted plan before touching anything.
//! - On a primitive failure, stops; already-applied operations are not
//!   rolled back.

use std::time::Instant;

use log::Level;
use serde_json::json;

use crate::fs::ops;
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{ts_for_mode, AuditSink, FactsEmitter, StageLogger};
use crate::types::ids::{op_id, plan_id};
use crate::types::{ApplyMode, ApplyReport, FileNode, Operation, Plan};

use super::errors::ApiError;
use super::Linkfarm;

pub(super) fn run<E: FactsEmitter, A: AuditSink>(
    api: &Linkfarm<E, A>,
    plan: &Plan,
    mode: ApplyMode,
) -> Result<ApplyReport, ApiError> {
    if plan.aborted {
        api.audit.log(Level::Error, "apply: refusing aborted plan");
        return Err(ApiError::Conflicts(plan.conflicts.len()));
    }

    let t0 = Instant::now();
    let dry = matches!(mode, ApplyMode::DryRun);
    let pid = plan_id(plan);
    let tctx = AuditCtx::new(
        &api.facts,
        pid.to_string(),
        ts_for_mode(&mode),
        AuditMode {
            dry_run: dry,
            redact: dry,
        },
    );
    let slog = StageLogger::new(&tctx);
    api.audit.log(Level::Info, "apply: starting");

    let mut executed: Vec<Operation> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    for (idx, op) in plan.ops.iter().enumerate() {
        let oid = op_id(&pid, op, idx).to_string();
        let path = op.target().display().to_string();
        slog.apply_attempt()
            .op(oid.clone())
            .path(path.clone())
            .field("kind", json!(op.kind()))
            .emit_success();

        let before_kind = FileNode::probe(op.target()).kind;
        let result = if dry { Ok(()) } else { execute(op) };
        match result {
            Ok(()) => {
                let after_kind = if dry {
                    before_kind
                } else {
                    FileNode::probe(op.target()).kind
                };
                slog.apply_result()
                    .op(oid)
                    .path(path)
                    .merge(&json!({
                        "kind": op.kind(),
                        "before_kind": before_kind.as_str(),
                        "after_kind": after_kind.as_str(),
                    }))
                    .emit_success();
                executed.push(op.clone());
            }
            Err(e) => {
                let msg = format!("{} '{}' failed: {e}", op.kind(), op.target().display());
                slog.apply_result()
                    .op(oid)
                    .path(path)
                    .field("error", json!(e.to_string()))
                    .emit_failure();
                api.audit.log(Level::Error, &msg);
                errors.push(msg);
                break;
            }
        }
    }

    let duration_ms = u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX);
    let summary = slog
        .apply_summary()
        .field("executed", json!(executed.len()))
        .field("duration_ms", json!(duration_ms));
    if errors.is_empty() {
        summary.emit_success();
    } else {
        summary.emit_failure();
    }
    api.audit.log(Level::Info, "apply: finished");

    Ok(ApplyReport {
        executed,
        errors,
        duration_ms,
    })
}

fn execute(op: &Operation) -> std::io::Result<()> {
    match op {
        Operation::CreateSymlink { source, target } => ops::create_symlink(source, target),
        Operation::RemoveLink { target } => ops::remove_link(target),
        Operation::CreateDirectory { target } => ops::create_directory(target),
        Operation::AlreadyLinked { .. } => Ok(()),
    }
}
