//! Tunable thresholds for the recommendation rules

use crate::concurrency::DEFAULT_PERCENTILE;
use crate::error::{Result, TunerError};
use serde::{Deserialize, Serialize};

/// Median runtime below which a task type should run locally (30 minutes)
pub const LOCAL_RUNTIME_SECS: f64 = 30.0 * 60.0;

/// Number of long-running tasks above which job arrays are suggested
pub const JOB_ARRAY_MIN_TASKS: usize = 100;

/// Thresholds used by the rule pipeline
///
/// Every field has a default, so a partial config file only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Median runtime (seconds) under which the local executor is advised
    pub local_runtime_secs: f64,
    /// CPU efficiency below which cores are reclaimed
    pub cpu_low_efficiency: f64,
    /// CPU efficiency above which one core of headroom is added
    pub cpu_high_efficiency: f64,
    /// RSS/VMEM ratio below which memory gets the low headroom factor
    pub memory_low_ratio: f64,
    /// RSS/VMEM ratio above which memory gets the high headroom factor
    pub memory_high_ratio: f64,
    pub memory_low_headroom: f64,
    pub memory_high_headroom: f64,
    /// Max/median runtime factor flagging high variance
    pub runtime_variance_factor: f64,
    pub job_array_min_tasks: usize,
    /// Percentile of concurrency samples the head job must cover
    pub concurrency_percentile: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            local_runtime_secs: LOCAL_RUNTIME_SECS,
            cpu_low_efficiency: 0.6,
            cpu_high_efficiency: 0.9,
            memory_low_ratio: 0.5,
            memory_high_ratio: 0.85,
            memory_low_headroom: 1.2,
            memory_high_headroom: 1.5,
            runtime_variance_factor: 3.0,
            job_array_min_tasks: JOB_ARRAY_MIN_TASKS,
            concurrency_percentile: DEFAULT_PERCENTILE,
        }
    }
}

impl Thresholds {
    /// Reject values the rules cannot work with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("local_runtime_secs", self.local_runtime_secs),
            ("cpu_low_efficiency", self.cpu_low_efficiency),
            ("cpu_high_efficiency", self.cpu_high_efficiency),
            ("memory_low_ratio", self.memory_low_ratio),
            ("memory_high_ratio", self.memory_high_ratio),
            ("memory_low_headroom", self.memory_low_headroom),
            ("memory_high_headroom", self.memory_high_headroom),
            ("runtime_variance_factor", self.runtime_variance_factor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(name, value, "must be a positive finite number"));
            }
        }

        if self.cpu_low_efficiency >= self.cpu_high_efficiency {
            return Err(invalid(
                "cpu_low_efficiency",
                self.cpu_low_efficiency,
                "must be below cpu_high_efficiency",
            ));
        }
        if self.memory_low_ratio >= self.memory_high_ratio {
            return Err(invalid(
                "memory_low_ratio",
                self.memory_low_ratio,
                "must be below memory_high_ratio",
            ));
        }
        if !(self.concurrency_percentile > 0.0 && self.concurrency_percentile <= 1.0) {
            return Err(invalid(
                "concurrency_percentile",
                self.concurrency_percentile,
                "must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> TunerError {
    TunerError::InvalidThreshold {
        name,
        value,
        reason,
    }
}
