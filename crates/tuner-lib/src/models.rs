//! Core data models for trace analysis

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status marker of a task instance whose measurements are usable
pub const COMPLETED_STATUS: &str = "COMPLETED";

/// One completed task execution parsed from a trace row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task type identity (parenthetical suffix stripped)
    pub process: String,
    pub realtime_secs: Option<f64>,
    pub cpu_percent: Option<f64>,
    pub peak_rss_mb: Option<f64>,
    pub peak_vmem_mb: Option<f64>,
    pub requested_cpus: Option<i64>,
    pub requested_memory_mb: Option<f64>,
    /// Submission time in epoch seconds
    pub submit_epoch_secs: Option<f64>,
}

impl TaskRecord {
    /// Execution span, when both submit time and a positive duration are known
    pub fn window(&self) -> Option<TimeWindow> {
        match (self.submit_epoch_secs, self.realtime_secs) {
            (Some(start), Some(duration)) => TimeWindow::new(start, start + duration),
            _ => None,
        }
    }
}

/// Execution span of a single task, in epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    /// Returns `None` unless `end > start`
    pub fn new(start: f64, end: f64) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }
}

/// Per-task resources a local-eligible task type needs on the head node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalResourceRequirement {
    pub cpus: f64,
    pub memory_gb: u64,
}

/// Workflow executor kinds understood by the tuner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Executor {
    Local,
    Slurm,
    Pbs,
}

impl Executor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Executor::Local => "local",
            Executor::Slurm => "slurm",
            Executor::Pbs => "pbs",
        }
    }

    /// Scheduler option requesting a job array of `size` elements
    ///
    /// Only SLURM arrays are emitted; other executors get `None`.
    pub fn array_option(&self, size: usize) -> Option<String> {
        match self {
            Executor::Slurm => Some(format!("--array=1-{}", size)),
            Executor::Local | Executor::Pbs => None,
        }
    }
}

impl fmt::Display for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Executor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Executor::Local),
            "slurm" => Ok(Executor::Slurm),
            "pbs" => Ok(Executor::Pbs),
            other => Err(format!("unknown executor '{}'", other)),
        }
    }
}

/// Per-process analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRow {
    pub process: String,
    pub tasks: usize,
    pub runtime_median_min: f64,
    pub local_eligible: bool,
    /// Human-readable advisories, in rule order
    pub recommendations: Vec<String>,
    /// Config directives staged for this process
    pub directives: Vec<String>,
}

impl ProcessRow {
    /// Advisories joined for display, or "Looks efficient" when there are none
    pub fn summary(&self) -> String {
        if self.recommendations.is_empty() {
            "Looks efficient".to_string()
        } else {
            self.recommendations.join("; ")
        }
    }
}
