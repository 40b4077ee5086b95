//! Summary statistics derived from a task type profile

use crate::aggregator::TaskTypeProfile;
use crate::parsers::gb_round;
use std::cmp::Ordering;

/// Statistics the rules evaluate, computed once per profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStats {
    pub process: String,
    pub task_count: usize,
    pub runtime_median_secs: f64,
    pub runtime_max_secs: f64,
    pub cpu_percent_median: Option<f64>,
    pub rss_max_mb: Option<f64>,
    pub vmem_max_mb: Option<f64>,
    /// Median requested CPUs; a zero request counts as unknown
    pub current_cpus: Option<f64>,
    /// Median requested memory, rounded to whole GB
    pub current_memory_gb: Option<u64>,
}

impl ProfileStats {
    /// Returns `None` for a profile without any parsed duration
    pub fn from_profile(profile: &TaskTypeProfile) -> Option<Self> {
        let requested_cpus: Vec<f64> = profile.requested_cpus.iter().map(|&c| c as f64).collect();

        Some(Self {
            process: profile.name.clone(),
            task_count: profile.task_count(),
            runtime_median_secs: median(&profile.durations)?,
            runtime_max_secs: max(&profile.durations)?,
            cpu_percent_median: median(&profile.cpu_percent),
            rss_max_mb: max(&profile.rss_mb),
            vmem_max_mb: max(&profile.vmem_mb),
            current_cpus: median(&requested_cpus).filter(|&c| c != 0.0),
            current_memory_gb: median(&profile.requested_memory_mb).map(gb_round),
        })
    }

    pub fn runtime_median_minutes(&self) -> f64 {
        round_to(self.runtime_median_secs / 60.0, 2)
    }
}

/// Median; the mean of the two middle values for an even count
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

pub fn max(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
}

/// Round to `decimals` places, half to even
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
