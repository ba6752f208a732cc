//! Audit helpers that emit structured facts across Linkfarm stages.
//!
//! Side-effects:
//! - Emits JSON facts via `FactsEmitter` for the stages `plan`,
//!   `plan.summary`, `apply.attempt`, `apply.result`, and `apply.summary`.
//! - Ensures a minimal envelope is present on every fact: `schema_version`,
//!   `ts`, `plan_id`, `path`, `dry_run`.
//! - Applies redaction in dry-run to zero timestamps and drop volatile fields.
use serde_json::{json, Value};

use crate::constants::TOOL_NAME;
use crate::logging::{redact_event, FactsEmitter};

pub(crate) const SCHEMA_VERSION: i64 = 1;

#[derive(Clone, Debug, Default)]
pub(crate) struct AuditMode {
    pub dry_run: bool,
    pub redact: bool,
}

pub(crate) struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub plan_id: String,
    pub ts: String,
    pub mode: AuditMode,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(
        facts: &'a dyn FactsEmitter,
        plan_id: String,
        ts: String,
        mode: AuditMode,
    ) -> Self {
        Self {
            facts,
            plan_id,
            ts,
            mode,
        }
    }
}

/// Stage for typed audit emission.
#[derive(Clone, Copy, Debug)]
pub enum Stage {
    Plan,
    PlanSummary,
    ApplyAttempt,
    ApplyResult,
    ApplySummary,
}

impl Stage {
    fn as_event(self) -> &'static str {
        match self {
            Stage::Plan => "plan",
            Stage::PlanSummary => "plan.summary",
            Stage::ApplyAttempt => "apply.attempt",
            Stage::ApplyResult => "apply.result",
            Stage::ApplySummary => "apply.summary",
        }
    }
}

/// Decision severity for audit events.
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Failure,
    Warn,
}

impl Decision {
    fn as_str(self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
            Decision::Warn => "warn",
        }
    }
}

/// Builder facade over audit emission with centralized envelope+redaction.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub(crate) fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn plan(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Plan)
    }
    pub fn plan_summary(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::PlanSummary)
    }
    pub fn apply_attempt(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::ApplyAttempt)
    }
    pub fn apply_result(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::ApplyResult)
    }
    pub fn apply_summary(&'a self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::ApplySummary)
    }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub fn op(mut self, op_id: impl Into<String>) -> Self {
        self.fields.insert("op_id".into(), json!(op_id.into()));
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.fields.insert("path".into(), json!(path.into()));
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn merge(mut self, extra: &Value) -> Self {
        if let Some(obj) = extra.as_object() {
            for (k, v) in obj.iter() {
                self.fields.insert(k.clone(), v.clone());
            }
        }
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = Value::Object(self.fields);
        if let Some(obj) = fields.as_object_mut() {
            obj.entry("decision").or_insert(json!(decision.as_str()));
        }
        redact_and_emit(
            self.ctx,
            TOOL_NAME,
            self.stage.as_event(),
            decision.as_str(),
            fields,
        );
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success)
    }
    pub fn emit_failure(self) {
        self.emit(Decision::Failure)
    }
    pub fn emit_warn(self) {
        self.emit(Decision::Warn)
    }
}

fn redact_and_emit(ctx: &AuditCtx, subsystem: &str, event: &str, decision: &str, mut fields: Value) {
    // Ensure minimal envelope fields
    if let Some(obj) = fields.as_object_mut() {
        obj.entry("schema_version").or_insert(json!(SCHEMA_VERSION));
        obj.entry("ts").or_insert(json!(ctx.ts));
        obj.entry("plan_id").or_insert(json!(ctx.plan_id));
        obj.entry("path").or_insert(json!(""));
        obj.entry("dry_run").or_insert(json!(ctx.mode.dry_run));
    }
    let out = if ctx.mode.redact {
        redact_event(fields)
    } else {
        fields
    };
    ctx.facts.emit(subsystem, event, decision, out);
}
