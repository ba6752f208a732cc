// Facade for API module; delegates to submodules under src/api/

use std::path::Path;

use crate::logging::{AuditSink, FactsEmitter};
use crate::types::{ApplyMode, ApplyReport, Plan};

mod apply;
mod build;
pub mod errors;

use errors::ApiError;

/// The public surface of the symlink-farm manager.
///
/// `E` receives structured facts per stage; `A` receives the human-readable
/// report lines (conflict messages). Both planning entry points return a
/// [`Plan`] that [`Linkfarm::apply`] consumes once; an aborted plan is
/// refused outright, so nothing is applied when any conflict is unresolved.
pub struct Linkfarm<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
}

impl<E: FactsEmitter, A: AuditSink> Linkfarm<E, A> {
    pub fn new(facts: E, audit: A) -> Self {
        Self { facts, audit }
    }

    /// Build a link-creation plan for every source against the shared
    /// destination, with duplicate-target resolution run to a fixed point.
    pub fn plan_stow<P: AsRef<Path>>(&self, sources: &[P], dest: &Path) -> Result<Plan, ApiError> {
        build::stow(self, sources, dest)
    }

    /// Build a link-removal plan. Per-entry conflicts are logged but never
    /// abort the plan.
    pub fn plan_unstow<P: AsRef<Path>>(
        &self,
        sources: &[P],
        dest: &Path,
    ) -> Result<Plan, ApiError> {
        build::unstow(self, sources, dest)
    }

    /// Single-entry convenience form of stow for one file or directory:
    /// plan exactly one link from `source` to the path `dest`.
    pub fn plan_link(&self, source: &Path, dest: &Path) -> Result<Plan, ApiError> {
        build::link(self, source, dest)
    }

    /// Apply operations strictly in list order. DryRun records what would
    /// execute without touching the filesystem.
    pub fn apply(&self, plan: &Plan, mode: ApplyMode) -> Result<ApplyReport, ApiError> {
        apply::run(self, plan, mode)
    }

    /// Plan and commit a stow in one call.
    pub fn stow<P: AsRef<Path>>(&self, sources: &[P], dest: &Path) -> Result<ApplyReport, ApiError> {
        let plan = self.plan_stow(sources, dest)?;
        self.commit(&plan)
    }

    /// Plan and commit an unstow in one call.
    pub fn unstow<P: AsRef<Path>>(
        &self,
        sources: &[P],
        dest: &Path,
    ) -> Result<ApplyReport, ApiError> {
        let plan = self.plan_unstow(sources, dest)?;
        self.commit(&plan)
    }

    /// Plan and commit a single link in one call.
    pub fn link(&self, source: &Path, dest: &Path) -> Result<ApplyReport, ApiError> {
        let plan = self.plan_link(source, dest)?;
        self.commit(&plan)
    }

    fn commit(&self, plan: &Plan) -> Result<ApplyReport, ApiError> {
        let report = self.apply(plan, ApplyMode::Commit)?;
        if report.errors.is_empty() {
            Ok(report)
        } else {
            Err(ApiError::Filesystem(report.errors.join("; ")))
        }
    }
}
