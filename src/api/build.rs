//! Plan building: input validation, the per-source walks, and the
//! conflict-resolution pass, in that order. Nothing here mutates the
//! filesystem.

use std::path::{Path, PathBuf};

use log::Level;
use serde_json::json;

use crate::constants::TOOL_NAME;
use crate::fs::inspect;
use crate::logging::audit::{AuditCtx, AuditMode};
use crate::logging::{AuditSink, FactsEmitter, StageLogger, TS_ZERO};
use crate::plan::{resolve, Walker};
use crate::policy::{StowPolicy, UnstowPolicy};
use crate::types::ids::{op_id, plan_id};
use crate::types::{Conflict, ConflictReason, FileNode, NodeKind, Operation, Plan};

use super::errors::ApiError;
use super::Linkfarm;

pub(super) fn stow<E: FactsEmitter, A: AuditSink, P: AsRef<Path>>(
    api: &Linkfarm<E, A>,
    sources: &[P],
    dest: &Path,
) -> Result<Plan, ApiError> {
    let dest_abs = require_dir(api, dest, || {
        format!(
            "{TOOL_NAME} stow: can not stow into '{}': No such directory",
            dest.display()
        )
    })?;

    let mut plan = Plan::default();
    let walker = Walker::new(&StowPolicy, &api.audit);
    for source in sources {
        let source = source.as_ref();
        // Fail fast: the first invalid source stops the whole build.
        let src_abs = require_dir(api, source, || {
            format!(
                "{TOOL_NAME} stow: can not stow '{}': No such directory",
                source.display()
            )
        })?;
        walker.walk(&src_abs, &dest_abs, false, &mut plan)?;
    }
    resolve::resolve(&walker, &mut plan)?;
    emit_plan_facts(api, &plan);
    Ok(plan)
}

pub(super) fn unstow<E: FactsEmitter, A: AuditSink, P: AsRef<Path>>(
    api: &Linkfarm<E, A>,
    sources: &[P],
    dest: &Path,
) -> Result<Plan, ApiError> {
    let dest_abs = require_dir(api, dest, || {
        format!(
            "{TOOL_NAME} unstow: can not unstow '{}': No such directory",
            dest.display()
        )
    })?;

    let mut plan = Plan::default();
    let walker = Walker::new(&UnstowPolicy, &api.audit);
    for source in sources {
        let source = source.as_ref();
        let src_abs = require_dir(api, source, || {
            format!(
                "{TOOL_NAME} unstow: can not unstow from '{}': No such directory",
                source.display()
            )
        })?;
        walker.walk(&src_abs, &dest_abs, false, &mut plan)?;
    }
    // Unstow plans carry no CreateSymlink operations; the resolver is a
    // structural no-op but keeps the build pipeline uniform.
    resolve::resolve(&walker, &mut plan)?;
    emit_plan_facts(api, &plan);
    Ok(plan)
}

pub(super) fn link<E: FactsEmitter, A: AuditSink>(
    api: &Linkfarm<E, A>,
    source: &Path,
    dest: &Path,
) -> Result<Plan, ApiError> {
    if !source.exists() {
        return Err(invalid(
            api,
            format!(
                "{TOOL_NAME} link: can not link '{}': No such directory",
                source.display()
            ),
        ));
    }
    if !inspect::is_readable(source) {
        return Err(invalid(
            api,
            format!(
                "{TOOL_NAME} link: can not link '{}': Insufficient permissions",
                source.display()
            ),
        ));
    }
    let parent = dest.parent().filter(|p| !p.as_os_str().is_empty());
    let parent = parent.unwrap_or_else(|| Path::new("."));
    if !parent.exists() {
        return Err(invalid(
            api,
            format!(
                "{TOOL_NAME} link: can not link '{}': No such directory",
                parent.display()
            ),
        ));
    }
    if !inspect::is_writable(parent) {
        return Err(invalid(
            api,
            format!(
                "{TOOL_NAME} link: can not link '{}': Insufficient permissions",
                parent.display()
            ),
        ));
    }
    let Some(name) = dest.file_name() else {
        return Err(invalid(
            api,
            format!(
                "{TOOL_NAME} link: can not link '{}': No such directory",
                dest.display()
            ),
        ));
    };

    let src_abs = std::fs::canonicalize(source)
        .map_err(|e| ApiError::Filesystem(format!("resolve '{}': {e}", source.display())))?;
    let dest_abs = std::fs::canonicalize(parent)
        .map_err(|e| ApiError::Filesystem(format!("resolve '{}': {e}", parent.display())))?
        .join(name);

    let mut plan = Plan::default();
    match FileNode::probe(&dest_abs).kind {
        NodeKind::Missing => plan.push(Operation::CreateSymlink {
            source: src_abs,
            target: dest_abs,
        }),
        NodeKind::BrokenSymlink => record_link_conflict(api, &mut plan, ConflictReason::BrokenLink, dest_abs),
        _ if inspect::same_file(&src_abs, &dest_abs) => plan.push(Operation::AlreadyLinked {
            source: src_abs,
            target: dest_abs,
        }),
        _ => record_link_conflict(api, &mut plan, ConflictReason::ExistingFile, dest_abs),
    }
    emit_plan_facts(api, &plan);
    Ok(plan)
}

fn record_link_conflict<E: FactsEmitter, A: AuditSink>(
    api: &Linkfarm<E, A>,
    plan: &mut Plan,
    reason: ConflictReason,
    path: PathBuf,
) {
    let conflict = Conflict::new("link", reason, path);
    api.audit.log(Level::Error, &conflict.message);
    plan.conflicts.push(conflict);
    plan.aborted = true;
}

/// Validate that `path` is an existing directory and return its canonical
/// absolute form. The message closure renders the compatibility wording.
fn require_dir<E: FactsEmitter, A: AuditSink>(
    api: &Linkfarm<E, A>,
    path: &Path,
    msg: impl FnOnce() -> String,
) -> Result<PathBuf, ApiError> {
    if !path.is_dir() {
        return Err(invalid(api, msg()));
    }
    std::fs::canonicalize(path)
        .map_err(|e| ApiError::Filesystem(format!("resolve '{}': {e}", path.display())))
}

fn invalid<E: FactsEmitter, A: AuditSink>(api: &Linkfarm<E, A>, msg: String) -> ApiError {
    api.audit.log(Level::Error, &msg);
    ApiError::InvalidInput(msg)
}

/// Emit one `plan` fact per operation and a `plan.summary` fact, mirroring
/// the apply-stage telemetry. Plan facts are always redacted; planning is
/// read-only and its output must be byte-stable.
fn emit_plan_facts<E: FactsEmitter, A: AuditSink>(api: &Linkfarm<E, A>, plan: &Plan) {
    let pid = plan_id(plan);
    let tctx = AuditCtx::new(
        &api.facts,
        pid.to_string(),
        TS_ZERO.to_string(),
        AuditMode {
            dry_run: true,
            redact: true,
        },
    );
    let slog = StageLogger::new(&tctx);
    for (idx, op) in plan.ops.iter().enumerate() {
        let oid = op_id(&pid, op, idx).to_string();
        slog.plan()
            .op(oid)
            .path(op.target().display().to_string())
            .field("kind", json!(op.kind()))
            .emit_success();
    }
    for conflict in &plan.conflicts {
        let ev = slog
            .plan()
            .path(conflict.path.display().to_string())
            .field("conflict", json!(conflict.reason.as_str()));
        // Fatal conflicts doomed the plan; the rest are advisories.
        if plan.aborted {
            ev.emit_failure();
        } else {
            ev.emit_warn();
        }
    }
    let summary = slog
        .plan_summary()
        .field("ops", json!(plan.ops.len()))
        .field("conflicts", json!(plan.conflicts.len()))
        .field("aborted", json!(plan.aborted));
    if plan.aborted {
        summary.emit_failure();
    } else {
        summary.emit_success();
    }
}
