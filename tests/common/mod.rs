//! Shared test helpers for the linkfarm integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use log::Level;
use serde_json::Value;

use linkfarm::logging::{AuditSink, FactsEmitter};
use linkfarm::Linkfarm;

/// A simple in-memory emitter to capture facts during tests.
#[derive(Clone, Default)]
pub struct TestEmitter {
    pub events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .unwrap()
            .push((subsystem.into(), event.into(), decision.into(), fields));
    }
}

/// Captures audit lines so tests can assert the exact conflict wording.
#[derive(Clone, Default)]
pub struct TestAudit {
    pub lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl AuditSink for TestAudit {
    fn log(&self, level: Level, msg: &str) {
        self.lines.lock().unwrap().push((level, msg.to_string()));
    }
}

impl TestAudit {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|(_, m)| m.contains(needle))
    }
}

pub fn farm() -> (Linkfarm<TestEmitter, TestAudit>, TestEmitter, TestAudit) {
    let facts = TestEmitter::default();
    let audit = TestAudit::default();
    (Linkfarm::new(facts.clone(), audit.clone()), facts, audit)
}

pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

pub fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}
