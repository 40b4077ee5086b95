//! Trace ingestion and per-process aggregation
//!
//! This module reads tab-delimited trace files, keeps only completed tasks,
//! and accumulates their measurements into one profile per task type.

mod profile;
mod trace_reader;


pub use profile::{Aggregator, IngestSummary, TaskTypeProfile};
pub use trace_reader::{discover_traces, parse_trace, read_trace, RawRecord, TraceTable};
