//! Applies the rule pipeline to every task type profile

use super::directives::{DirectiveSet, Finding, Patch};
use super::head::HeadAllocation;
use super::rules::default_rules;
use super::stats::ProfileStats;
use super::thresholds::Thresholds;
use super::{Rule, RuleContext};
use crate::aggregator::TaskTypeProfile;
use crate::models::{Executor, LocalResourceRequirement, ProcessRow, TimeWindow};
use crate::observability::AnalysisLogger;
use serde::Serialize;
use std::collections::BTreeMap;

/// Accumulated result of the rules evaluated so far for one task type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub advisories: Vec<String>,
    pub directives: DirectiveSet,
    pub local_eligible: bool,
    pub recommended_cpus: Option<u32>,
    pub recommended_memory_gb: Option<u64>,
    pub local_requirement: Option<LocalResourceRequirement>,
}

impl Evaluation {
    /// Apply a rule's patch; advisories are only ever appended
    pub fn apply(&mut self, patch: Patch) {
        self.advisories.extend(patch.advisories);
        for op in patch.ops {
            self.directives.apply(op);
        }
        for finding in patch.findings {
            match finding {
                Finding::LocalEligible => self.local_eligible = true,
                Finding::RecommendedCpus(cpus) => self.recommended_cpus = Some(cpus),
                Finding::RecommendedMemoryGb(gb) => self.recommended_memory_gb = Some(gb),
                Finding::LocalRequirement(req) => self.local_requirement = Some(req),
            }
        }
    }
}

/// Result of analyzing all task types of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    /// One row per reported task type, in first-seen order
    pub rows: Vec<ProcessRow>,
    /// Directive lines per task type, sorted by name
    pub config: BTreeMap<String, Vec<String>>,
    pub local_requirements: Vec<LocalResourceRequirement>,
    #[serde(skip_serializing)]
    pub local_windows: Vec<TimeWindow>,
    pub head_allocation: Option<HeadAllocation>,
}

/// Runs the rule pipeline over task type profiles
pub struct RecommendationEngine {
    thresholds: Thresholds,
    default_executor: Option<Executor>,
    rules: Vec<Box<dyn Rule>>,
}

impl RecommendationEngine {
    pub fn new(thresholds: Thresholds, default_executor: Option<Executor>) -> Self {
        Self::with_rules(thresholds, default_executor, default_rules())
    }

    pub fn with_rules(
        thresholds: Thresholds,
        default_executor: Option<Executor>,
        rules: Vec<Box<dyn Rule>>,
    ) -> Self {
        Self {
            thresholds,
            default_executor,
            rules,
        }
    }

    /// Evaluate every rule in order against one task type
    pub fn evaluate(&self, stats: &ProfileStats, logger: &AnalysisLogger) -> Evaluation {
        let ctx = RuleContext {
            thresholds: &self.thresholds,
            default_executor: self.default_executor,
        };
        let mut state = Evaluation::default();
        for rule in &self.rules {
            if let Some(patch) = rule.evaluate(stats, &ctx, &state) {
                logger.log_rule_applied(&stats.process, rule.name(), &patch);
                state.apply(patch);
            }
        }
        state
    }

    /// Analyze all profiles, skipping those with fewer than `min_tasks` tasks
    pub fn analyze(
        &self,
        profiles: Vec<TaskTypeProfile>,
        min_tasks: usize,
        logger: &AnalysisLogger,
    ) -> Analysis {
        let mut analysis = Analysis::default();

        for profile in profiles {
            if profile.task_count() < min_tasks {
                logger.log_task_type_skipped(&profile.name, profile.task_count(), min_tasks);
                continue;
            }
            let Some(stats) = ProfileStats::from_profile(&profile) else {
                logger.log_task_type_skipped(&profile.name, 0, min_tasks);
                continue;
            };

            let evaluation = self.evaluate(&stats, logger);

            if let Some(requirement) = evaluation.local_requirement {
                analysis.local_requirements.push(requirement);
                analysis.local_windows.extend_from_slice(&profile.windows);
            }

            let directives = evaluation.directives.lines();
            if !directives.is_empty() {
                analysis.config.insert(profile.name.clone(), directives.clone());
            }

            let row = ProcessRow {
                process: profile.name,
                tasks: stats.task_count,
                runtime_median_min: stats.runtime_median_minutes(),
                local_eligible: evaluation.local_eligible,
                recommendations: evaluation.advisories,
                directives,
            };
            logger.log_task_type_analyzed(&row);
            analysis.rows.push(row);
        }

        analysis.head_allocation = HeadAllocation::estimate(
            &analysis.local_requirements,
            &analysis.local_windows,
            self.thresholds.concurrency_percentile,
        );
        if let Some(head) = &analysis.head_allocation {
            logger.log_head_allocation(head, analysis.local_requirements.len());
        }
        analysis
    }
}
