//! Per-process profiles and the aggregator that builds them

use super::trace_reader::{read_trace, RawRecord};
use crate::error::{Result, TunerError};
use crate::models::{TaskRecord, TimeWindow, COMPLETED_STATUS};
use crate::parsers::{
    parse_cpu_percent, parse_duration, parse_int, parse_memory, parse_submit, process_name,
};
use std::collections::HashMap;
use std::path::Path;

impl TaskRecord {
    /// Build a record from a raw trace row
    ///
    /// Returns `Ok(None)` for rows whose status is not `COMPLETED`. Only a
    /// malformed submit timestamp is an error, and the timestamp is only
    /// read when the row also has a positive duration.
    pub fn from_raw(raw: &RawRecord) -> Result<Option<Self>> {
        if raw.get("status") != Some(COMPLETED_STATUS) {
            return Ok(None);
        }

        let realtime_secs = parse_duration(raw.get("realtime"));
        let submit_epoch_secs = match (raw.get("submit"), realtime_secs) {
            (Some(submit), Some(duration)) if !submit.is_empty() && duration > 0.0 => {
                Some(parse_submit(submit)?)
            }
            _ => None,
        };

        Ok(Some(Self {
            process: process_name(raw.get("name").unwrap_or_default()).to_string(),
            realtime_secs,
            cpu_percent: parse_cpu_percent(raw.get("%cpu")),
            peak_rss_mb: parse_memory(raw.get("peak_rss")),
            peak_vmem_mb: parse_memory(raw.get("peak_vmem")),
            requested_cpus: parse_int(raw.get("cpus")),
            requested_memory_mb: parse_memory(raw.get("memory")),
            submit_epoch_secs,
        }))
    }
}

/// All measurements observed for one task type
///
/// Each metric keeps only its successfully parsed values, so an empty vector
/// means the metric was never observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskTypeProfile {
    pub name: String,
    pub durations: Vec<f64>,
    pub cpu_percent: Vec<f64>,
    pub rss_mb: Vec<f64>,
    pub vmem_mb: Vec<f64>,
    pub requested_cpus: Vec<i64>,
    pub requested_memory_mb: Vec<f64>,
    pub windows: Vec<TimeWindow>,
}

impl TaskTypeProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of tasks with a parsed duration
    pub fn task_count(&self) -> usize {
        self.durations.len()
    }

    /// Append every parsed metric of `record`
    pub fn add(&mut self, record: &TaskRecord) {
        if let Some(d) = record.realtime_secs {
            self.durations.push(d);
        }
        if let Some(cpu) = record.cpu_percent {
            self.cpu_percent.push(cpu);
        }
        if let Some(rss) = record.peak_rss_mb {
            self.rss_mb.push(rss);
        }
        if let Some(vmem) = record.peak_vmem_mb {
            self.vmem_mb.push(vmem);
        }
        if let Some(cpus) = record.requested_cpus {
            self.requested_cpus.push(cpus);
        }
        if let Some(mem) = record.requested_memory_mb {
            self.requested_memory_mb.push(mem);
        }
        if let Some(window) = record.window() {
            self.windows.push(window);
        }
    }
}

/// Row counts for one ingested trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub rows: usize,
    pub completed: usize,
}

/// Groups completed task records by task type
///
/// Profiles are kept in first-seen order.
#[derive(Debug, Default)]
pub struct Aggregator {
    profiles: Vec<TaskTypeProfile>,
    index: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one raw row; rows that are not completed are ignored
    pub fn ingest(&mut self, raw: &RawRecord) -> Result<bool> {
        match TaskRecord::from_raw(raw)? {
            Some(record) => {
                self.add_record(&record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn add_record(&mut self, record: &TaskRecord) {
        let idx = match self.index.get(&record.process) {
            Some(&idx) => idx,
            None => {
                self.profiles.push(TaskTypeProfile::new(&record.process));
                self.index.insert(record.process.clone(), self.profiles.len() - 1);
                self.profiles.len() - 1
            }
        };
        self.profiles[idx].add(record);
    }

    /// Read a trace file and ingest all of its rows
    pub fn ingest_file(&mut self, path: &Path) -> Result<IngestSummary> {
        let table = read_trace(path)?;
        let mut summary = IngestSummary {
            rows: table.records.len(),
            completed: 0,
        };

        for raw in &table.records {
            let admitted = self.ingest(raw).map_err(|source| TunerError::Record {
                path: path.to_path_buf(),
                line: raw.line,
                source: Box::new(source),
            })?;
            if admitted {
                summary.completed += 1;
            }
        }
        Ok(summary)
    }

    pub fn profile(&self, name: &str) -> Option<&TaskTypeProfile> {
        self.index.get(name).map(|&idx| &self.profiles[idx])
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Finish ingestion and hand over the profiles in first-seen order
    pub fn finish(self) -> Vec<TaskTypeProfile> {
        self.profiles
    }
}
