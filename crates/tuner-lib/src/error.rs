//! Error types for trace analysis

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TunerError>;

/// Fatal conditions raised while reading or analyzing traces
///
/// Malformed individual metrics are not errors; they are skipped per field.
#[derive(Debug, Error)]
pub enum TunerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("malformed submit timestamp '{value}' (expected YYYY-MM-DD HH:MM:SS.ffffff)")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("{path}:{line}: {source}")]
    Record {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<TunerError>,
    },

    #[error("invalid threshold {name} = {value}: {reason}")]
    InvalidThreshold {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}
