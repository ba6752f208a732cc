use log::Level;
use serde_json::Value;

/// Receives structured JSON facts for each planning/apply stage.
pub trait FactsEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value);
}

/// Receives human-readable report lines (conflict messages, stage notes).
/// This is the reporting collaborator that conflict wording is addressed to.
pub trait AuditSink {
    fn log(&self, level: Level, msg: &str);
}

/// No-op sink; stands in where callers do not care about facts or audit.
#[derive(Default)]
pub struct JsonlSink;

impl FactsEmitter for JsonlSink {
    fn emit(&self, _subsystem: &str, _event: &str, _decision: &str, _fields: Value) {}
}

impl AuditSink for JsonlSink {
    fn log(&self, _level: Level, _msg: &str) {}
}
