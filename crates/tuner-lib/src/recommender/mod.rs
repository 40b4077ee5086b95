//! Heuristic recommendation engine
//!
//! Statistics derived from each task type profile flow through an ordered
//! pipeline of rules. Each rule returns a patch (advisories, directive
//! operations, findings) that the engine applies in order, so a later rule
//! can replace a directive staged by an earlier one without dropping its
//! advisory.

mod directives;
mod engine;
mod head;
mod rules;
mod stats;
mod thresholds;

pub use directives::{Directive, DirectiveOp, DirectiveSet, Finding, Patch};
pub use engine::{Analysis, Evaluation, RecommendationEngine};
pub use head::HeadAllocation;
pub use rules::{
    default_rules, CpuTuningRule, JobArrayRule, LocalExecutorRule, LocalResourceRule,
    MemoryTuningRule, RuntimeVarianceRule,
};
pub use stats::{max, median, round_to, ProfileStats};
pub use thresholds::{Thresholds, JOB_ARRAY_MIN_TASKS, LOCAL_RUNTIME_SECS};

use crate::models::Executor;

/// Inputs shared by every rule in a run
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub thresholds: &'a Thresholds,
    pub default_executor: Option<Executor>,
}

/// A single heuristic in the recommendation pipeline
pub trait Rule: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Inspect the statistics and the evaluation so far; `None` means no change
    fn evaluate(
        &self,
        stats: &ProfileStats,
        ctx: &RuleContext<'_>,
        state: &Evaluation,
    ) -> Option<Patch>;
}
