//! Structured logging for analysis runs
//!
//! Events are emitted through `tracing` with a stable `event` field so JSON
//! log output can be filtered by event kind.

use crate::models::ProcessRow;
use crate::recommender::{HeadAllocation, Patch};
use std::path::Path;
use tracing::{debug, info};

/// Structured logger for analysis events
///
/// Every event carries the input the run was started with.
#[derive(Clone)]
pub struct AnalysisLogger {
    source: String,
}

impl AnalysisLogger {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Log a trace file being ingested
    pub fn log_trace_loaded(&self, path: &Path, rows: usize, completed: usize) {
        info!(
            event = "trace_loaded",
            source = %self.source,
            path = %path.display(),
            rows = rows,
            completed = completed,
            "Loaded trace file"
        );
    }

    /// Log a task type excluded for having too few tasks
    pub fn log_task_type_skipped(&self, process: &str, tasks: usize, min_tasks: usize) {
        debug!(
            event = "task_type_skipped",
            source = %self.source,
            process = %process,
            tasks = tasks,
            min_tasks = min_tasks,
            "Skipping task type below minimum task count"
        );
    }

    pub fn log_rule_applied(&self, process: &str, rule: &str, patch: &Patch) {
        debug!(
            event = "rule_applied",
            process = %process,
            rule = %rule,
            advisories = patch.advisories.len(),
            directive_ops = patch.ops.len(),
            findings = patch.findings.len(),
            "Rule produced a patch"
        );
    }

    /// Log the outcome for one task type
    pub fn log_task_type_analyzed(&self, row: &ProcessRow) {
        info!(
            event = "task_type_analyzed",
            source = %self.source,
            process = %row.process,
            tasks = row.tasks,
            runtime_median_min = row.runtime_median_min,
            local_eligible = row.local_eligible,
            advisories = row.recommendations.len(),
            directives = row.directives.len(),
            "Analyzed task type"
        );
    }

    pub fn log_head_allocation(&self, head: &HeadAllocation, local_task_types: usize) {
        info!(
            event = "head_allocation_estimated",
            source = %self.source,
            local_task_types = local_task_types,
            peak_concurrency = head.peak_concurrency,
            cpus = head.cpus,
            memory_gb = head.memory_gb,
            "Estimated head job allocation"
        );
    }
}
