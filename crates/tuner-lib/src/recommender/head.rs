//! Head job sizing for local-executor tasks

use crate::concurrency::estimate_peak_concurrency;
use crate::models::{LocalResourceRequirement, TimeWindow};
use serde::{Deserialize, Serialize};

/// Resources the head job needs to run local tasks at estimated peak overlap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadAllocation {
    pub peak_concurrency: usize,
    /// Largest per-task CPU requirement among local task types
    pub per_task_cpus: f64,
    /// Largest per-task memory requirement among local task types
    pub per_task_memory_gb: u64,
    pub cpus: f64,
    pub memory_gb: u64,
}

impl HeadAllocation {
    /// Size the head job from local requirements and their pooled windows
    ///
    /// Returns `None` when no task type qualified for local execution.
    pub fn estimate(
        requirements: &[LocalResourceRequirement],
        windows: &[TimeWindow],
        percentile: f64,
    ) -> Option<Self> {
        let per_task_cpus = requirements.iter().map(|r| r.cpus).reduce(f64::max)?;
        let per_task_memory_gb = requirements.iter().map(|r| r.memory_gb).max()?;
        let peak_concurrency = estimate_peak_concurrency(windows, percentile);

        Some(Self {
            peak_concurrency,
            per_task_cpus,
            per_task_memory_gb,
            cpus: per_task_cpus * peak_concurrency as f64,
            memory_gb: per_task_memory_gb * peak_concurrency as u64,
        })
    }
}
