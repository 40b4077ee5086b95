//! The rule pipeline, in evaluation order

use super::directives::{Directive, DirectiveOp, Finding, Patch};
use super::engine::Evaluation;
use super::stats::ProfileStats;
use super::{Rule, RuleContext};
use crate::models::{Executor, LocalResourceRequirement};
use crate::parsers::gb_round;

/// Label staged for task types with erratic runtimes
pub const IO_INTENSIVE_LABEL: &str = "io_intensive";

/// The standard pipeline
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(LocalExecutorRule),
        Box::new(CpuTuningRule),
        Box::new(MemoryTuningRule),
        Box::new(RuntimeVarianceRule),
        Box::new(JobArrayRule),
        Box::new(LocalResourceRule),
    ]
}

/// Short-lived task types run on the local executor
pub struct LocalExecutorRule;

impl Rule for LocalExecutorRule {
    fn name(&self) -> &'static str {
        "local_executor"
    }

    fn evaluate(&self, stats: &ProfileStats, ctx: &RuleContext<'_>, _: &Evaluation) -> Option<Patch> {
        if stats.runtime_median_secs >= ctx.thresholds.local_runtime_secs {
            return None;
        }
        Some(
            Patch::new()
                .advise("Use local executor (short-lived tasks)")
                .push(Directive::Executor(Executor::Local))
                .finding(Finding::LocalEligible),
        )
    }
}

/// Right-size CPUs from median utilisation
///
/// Efficiency is measured against the core count implied by utilisation,
/// not against the requested count.
pub struct CpuTuningRule;

impl CpuTuningRule {
    pub fn recommend(cpu_percent: f64, low: f64, high: f64) -> u32 {
        let cores = cpu_percent / 100.0;
        let estimated = cores.round_ties_even().max(1.0);
        let efficiency = cpu_percent / (estimated * 100.0);

        let recommended = if efficiency < low {
            cores.floor().max(1.0)
        } else if efficiency > high {
            estimated + 1.0
        } else {
            estimated
        };
        recommended as u32
    }
}

impl Rule for CpuTuningRule {
    fn name(&self) -> &'static str {
        "cpu_tuning"
    }

    fn evaluate(&self, stats: &ProfileStats, ctx: &RuleContext<'_>, _: &Evaluation) -> Option<Patch> {
        // A zero median reads as "not measured", like a zero CPU request
        let cpu_percent = stats.cpu_percent_median.filter(|&c| c > 0.0)?;
        let recommended = Self::recommend(
            cpu_percent,
            ctx.thresholds.cpu_low_efficiency,
            ctx.thresholds.cpu_high_efficiency,
        );
        let mut patch = Patch::new().finding(Finding::RecommendedCpus(recommended));

        if let Some(current) = stats.current_cpus {
            let target = f64::from(recommended);
            if target != current {
                let direction = if target < current { "Reduce" } else { "Increase" };
                patch = patch
                    .advise(format!(
                        "{} cpus (current: {} → recommended: {})",
                        direction, current, recommended
                    ))
                    .push(Directive::Cpus(recommended));
            }
        }
        Some(patch)
    }
}

/// Right-size memory from peak RSS, with headroom chosen by RSS/VMEM ratio
pub struct MemoryTuningRule;

impl MemoryTuningRule {
    pub fn recommend(rss_mb: f64, vmem_mb: f64, ctx: &RuleContext<'_>) -> u64 {
        let t = ctx.thresholds;
        let ratio = rss_mb / vmem_mb;
        if ratio < t.memory_low_ratio {
            gb_round(rss_mb * t.memory_low_headroom)
        } else if ratio > t.memory_high_ratio {
            gb_round(rss_mb * t.memory_high_headroom)
        } else {
            gb_round(rss_mb)
        }
    }
}

impl Rule for MemoryTuningRule {
    fn name(&self) -> &'static str {
        "memory_tuning"
    }

    fn evaluate(&self, stats: &ProfileStats, ctx: &RuleContext<'_>, _: &Evaluation) -> Option<Patch> {
        let rss = stats.rss_max_mb.filter(|&v| v > 0.0)?;
        let vmem = stats.vmem_max_mb.filter(|&v| v > 0.0)?;
        let recommended = Self::recommend(rss, vmem, ctx);
        let mut patch = Patch::new().finding(Finding::RecommendedMemoryGb(recommended));

        if let Some(current) = stats.current_memory_gb {
            if recommended != current {
                let direction = if recommended < current { "Reduce" } else { "Increase" };
                patch = patch
                    .advise(format!(
                        "{} memory (current: {} GB → recommended: {} GB)",
                        direction, current, recommended
                    ))
                    .push(Directive::MemoryGb(recommended));
            }
        }
        Some(patch)
    }
}

/// Flag task types whose slowest run dwarfs the median
pub struct RuntimeVarianceRule;

impl Rule for RuntimeVarianceRule {
    fn name(&self) -> &'static str {
        "runtime_variance"
    }

    fn evaluate(&self, stats: &ProfileStats, ctx: &RuleContext<'_>, _: &Evaluation) -> Option<Patch> {
        let limit = ctx.thresholds.runtime_variance_factor * stats.runtime_median_secs;
        if stats.runtime_max_secs <= limit {
            return None;
        }
        Some(
            Patch::new()
                .advise("High runtime variance")
                .push(Directive::Label(IO_INTENSIVE_LABEL.to_string())),
        )
    }
}

/// Batch many long-running tasks into SLURM job arrays
///
/// Overrides any local executor directive staged earlier.
pub struct JobArrayRule;

impl Rule for JobArrayRule {
    fn name(&self) -> &'static str {
        "job_array"
    }

    fn evaluate(&self, stats: &ProfileStats, ctx: &RuleContext<'_>, _: &Evaluation) -> Option<Patch> {
        let executor = ctx.default_executor?;
        if stats.runtime_median_secs <= ctx.thresholds.local_runtime_secs
            || stats.task_count <= ctx.thresholds.job_array_min_tasks
        {
            return None;
        }
        let array = executor.array_option(stats.task_count)?;

        Some(
            Patch::new()
                .advise(format!(
                    "Use {} job arrays (>{} long-running tasks)",
                    executor.as_str().to_uppercase(),
                    ctx.thresholds.job_array_min_tasks
                ))
                .push(Directive::ClusterOptions(array))
                .op(DirectiveOp::EnsureExecutor(executor)),
        )
    }
}

/// Record what a local-eligible task type needs on the head node
pub struct LocalResourceRule;

impl Rule for LocalResourceRule {
    fn name(&self) -> &'static str {
        "local_resources"
    }

    fn evaluate(&self, stats: &ProfileStats, _: &RuleContext<'_>, state: &Evaluation) -> Option<Patch> {
        if !state.local_eligible {
            return None;
        }
        let cpus = state
            .recommended_cpus
            .map(f64::from)
            .or(stats.current_cpus)?;
        let memory_gb = state.recommended_memory_gb.or(stats.current_memory_gb)?;

        Some(Patch::new().finding(Finding::LocalRequirement(LocalResourceRequirement {
            cpus,
            memory_gb,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommender::Thresholds;

    fn stats(median: f64) -> ProfileStats {
        ProfileStats {
            process: "P".to_string(),
            task_count: 10,
            runtime_median_secs: median,
            runtime_max_secs: median,
            cpu_percent_median: None,
            rss_max_mb: None,
            vmem_max_mb: None,
            current_cpus: None,
            current_memory_gb: None,
        }
    }

    fn eval(rule: &dyn Rule, stats: &ProfileStats, executor: Option<Executor>) -> Option<Patch> {
        let thresholds = Thresholds::default();
        let ctx = RuleContext {
            thresholds: &thresholds,
            default_executor: executor,
        };
        rule.evaluate(stats, &ctx, &Evaluation::default())
    }

    #[test]
    fn test_local_executor_threshold() {
        let patch = eval(&LocalExecutorRule, &stats(1799.0), None).unwrap();
        assert_eq!(patch.findings, vec![Finding::LocalEligible]);
        assert_eq!(
            patch.ops,
            vec![DirectiveOp::Push(Directive::Executor(Executor::Local))]
        );
        assert!(eval(&LocalExecutorRule, &stats(1800.0), None).is_none());
    }

    #[test]
    fn test_cpu_recommendation_bands() {
        // est 2, efficiency 0.75: keep the estimate
        assert_eq!(CpuTuningRule::recommend(150.0, 0.6, 0.9), 2);
        // est 1, efficiency 0.98: add headroom
        assert_eq!(CpuTuningRule::recommend(98.4, 0.6, 0.9), 2);
        // est 1, efficiency 0.3: floor clamps to 1
        assert_eq!(CpuTuningRule::recommend(30.0, 0.6, 0.9), 1);
        // est 4 (half to even), efficiency 1.125: add headroom
        assert_eq!(CpuTuningRule::recommend(450.0, 0.6, 0.9), 5);
        // est 2 (half to even), efficiency 1.25
        assert_eq!(CpuTuningRule::recommend(250.0, 0.6, 0.9), 3);
        assert_eq!(CpuTuningRule::recommend(0.0, 0.6, 0.9), 1);
    }

    #[test]
    fn test_cpu_rule_emits_direction() {
        let mut s = stats(60.0);
        s.cpu_percent_median = Some(150.0);
        s.current_cpus = Some(8.0);

        let patch = eval(&CpuTuningRule, &s, None).unwrap();
        assert_eq!(patch.advisories, vec!["Reduce cpus (current: 8 → recommended: 2)"]);
        assert_eq!(patch.ops, vec![DirectiveOp::Push(Directive::Cpus(2))]);
        assert_eq!(patch.findings, vec![Finding::RecommendedCpus(2)]);

        s.current_cpus = Some(1.0);
        let patch = eval(&CpuTuningRule, &s, None).unwrap();
        assert_eq!(patch.advisories, vec!["Increase cpus (current: 1 → recommended: 2)"]);
    }

    #[test]
    fn test_cpu_rule_matching_request_is_silent() {
        let mut s = stats(60.0);
        s.cpu_percent_median = Some(150.0);
        s.current_cpus = Some(2.0);

        let patch = eval(&CpuTuningRule, &s, None).unwrap();
        assert!(patch.advisories.is_empty());
        assert!(patch.ops.is_empty());
        assert_eq!(patch.findings, vec![Finding::RecommendedCpus(2)]);
    }

    #[test]
    fn test_cpu_rule_needs_utilisation() {
        let mut s = stats(60.0);
        s.current_cpus = Some(4.0);
        assert!(eval(&CpuTuningRule, &s, None).is_none());

        s.cpu_percent_median = Some(0.0);
        assert!(eval(&CpuTuningRule, &s, None).is_none());
    }

    #[test]
    fn test_memory_bands() {
        let thresholds = Thresholds::default();
        let ctx = RuleContext {
            thresholds: &thresholds,
            default_executor: None,
        };
        // ratio 0.25 -> 1.2x headroom: 5120 * 1.2 = 6144 MB = 6 GB
        assert_eq!(MemoryTuningRule::recommend(5120.0, 20480.0, &ctx), 6);
        // ratio 0.9 -> 1.5x headroom: 4096 * 1.5 = 6 GB
        assert_eq!(MemoryTuningRule::recommend(4096.0, 4551.0, &ctx), 6);
        // ratio 0.7 -> as observed
        assert_eq!(MemoryTuningRule::recommend(4096.0, 5851.0, &ctx), 4);
    }

    #[test]
    fn test_memory_rule_emits_direction() {
        let mut s = stats(60.0);
        s.rss_max_mb = Some(100.0);
        s.vmem_max_mb = Some(200.0);
        s.current_memory_gb = Some(2);

        let patch = eval(&MemoryTuningRule, &s, None).unwrap();
        assert_eq!(
            patch.advisories,
            vec!["Reduce memory (current: 2 GB → recommended: 1 GB)"]
        );
        assert_eq!(patch.ops, vec![DirectiveOp::Push(Directive::MemoryGb(1))]);
    }

    #[test]
    fn test_memory_rule_needs_both_peaks() {
        let mut s = stats(60.0);
        s.rss_max_mb = Some(100.0);
        assert!(eval(&MemoryTuningRule, &s, None).is_none());

        s.vmem_max_mb = Some(0.0);
        assert!(eval(&MemoryTuningRule, &s, None).is_none());
    }

    #[test]
    fn test_runtime_variance() {
        let mut s = stats(100.0);
        s.runtime_max_secs = 300.0;
        assert!(eval(&RuntimeVarianceRule, &s, None).is_none());

        s.runtime_max_secs = 301.0;
        let patch = eval(&RuntimeVarianceRule, &s, None).unwrap();
        assert_eq!(patch.advisories, vec!["High runtime variance"]);
        assert_eq!(
            patch.ops,
            vec![DirectiveOp::Push(Directive::Label("io_intensive".into()))]
        );
    }

    #[test]
    fn test_job_array_conditions() {
        let mut s = stats(3600.0);
        s.task_count = 150;

        assert!(eval(&JobArrayRule, &s, None).is_none());
        assert!(eval(&JobArrayRule, &s, Some(Executor::Local)).is_none());

        let patch = eval(&JobArrayRule, &s, Some(Executor::Slurm)).unwrap();
        assert_eq!(
            patch.advisories,
            vec!["Use SLURM job arrays (>100 long-running tasks)"]
        );
        assert_eq!(
            patch.ops,
            vec![
                DirectiveOp::Push(Directive::ClusterOptions("--array=1-150".into())),
                DirectiveOp::EnsureExecutor(Executor::Slurm),
            ]
        );

        assert!(eval(&JobArrayRule, &s, Some(Executor::Pbs)).is_none());

        s.task_count = 100;
        assert!(eval(&JobArrayRule, &s, Some(Executor::Slurm)).is_none());

        s.task_count = 150;
        s.runtime_median_secs = 1800.0;
        assert!(eval(&JobArrayRule, &s, Some(Executor::Slurm)).is_none());
    }

    #[test]
    fn test_local_resources_prefer_recommendations() {
        let thresholds = Thresholds::default();
        let ctx = RuleContext {
            thresholds: &thresholds,
            default_executor: None,
        };
        let mut s = stats(10.0);
        s.current_cpus = Some(4.0);
        s.current_memory_gb = Some(8);

        let mut state = Evaluation::default();
        assert!(LocalResourceRule.evaluate(&s, &ctx, &state).is_none());

        state.local_eligible = true;
        let patch = LocalResourceRule.evaluate(&s, &ctx, &state).unwrap();
        assert_eq!(
            patch.findings,
            vec![Finding::LocalRequirement(LocalResourceRequirement { cpus: 4.0, memory_gb: 8 })]
        );

        state.recommended_cpus = Some(2);
        state.recommended_memory_gb = Some(1);
        let patch = LocalResourceRule.evaluate(&s, &ctx, &state).unwrap();
        assert_eq!(
            patch.findings,
            vec![Finding::LocalRequirement(LocalResourceRequirement { cpus: 2.0, memory_gb: 1 })]
        );
    }

    #[test]
    fn test_local_resources_need_both_values() {
        let thresholds = Thresholds::default();
        let ctx = RuleContext {
            thresholds: &thresholds,
            default_executor: None,
        };
        let mut s = stats(10.0);
        s.current_cpus = Some(4.0);
        let state = Evaluation {
            local_eligible: true,
            ..Default::default()
        };
        assert!(LocalResourceRule.evaluate(&s, &ctx, &state).is_none());
    }
}
