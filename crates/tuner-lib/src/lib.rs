//! Trace analysis library for workflow resource tuning
//!
//! This crate provides the core functionality for:
//! - Parsing trace fields (durations, memory sizes, CPU usage, timestamps)
//! - Aggregating completed task records into per-process profiles
//! - Estimating peak concurrency from task time windows
//! - Heuristic resource recommendations and head job sizing
//! - Rendering the text report and the tuning config file

pub mod aggregator;
pub mod concurrency;
pub mod emit;
pub mod error;
pub mod models;
pub mod observability;
pub mod parsers;
pub mod recommender;

pub use aggregator::{discover_traces, Aggregator, TaskTypeProfile};
pub use concurrency::{estimate_peak_concurrency, DEFAULT_PERCENTILE};
pub use error::{Result, TunerError};
pub use models::*;
pub use observability::AnalysisLogger;
pub use recommender::{Analysis, HeadAllocation, RecommendationEngine, Thresholds};

use std::path::Path;

/// Options controlling a single analysis run
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Task types with fewer parsed tasks than this are excluded
    pub min_tasks: usize,
    /// Executor the workflow runs with by default, if declared
    pub default_executor: Option<Executor>,
    /// Heuristic thresholds
    pub thresholds: Thresholds,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            min_tasks: 1,
            default_executor: None,
            thresholds: Thresholds::default(),
        }
    }
}

/// Run the full pipeline over a trace file or a directory of traces
pub fn analyze_path(input: &Path, options: &AnalysisOptions) -> Result<Analysis> {
    options.thresholds.validate()?;

    let logger = AnalysisLogger::new(input.display().to_string());
    let mut aggregator = Aggregator::new();
    for trace in discover_traces(input)? {
        let summary = aggregator.ingest_file(&trace)?;
        logger.log_trace_loaded(&trace, summary.rows, summary.completed);
    }

    let engine = RecommendationEngine::new(options.thresholds.clone(), options.default_executor);
    Ok(engine.analyze(aggregator.finish(), options.min_tasks, &logger))
}
