//! Tab-delimited trace reading and trace file discovery

use crate::error::{Result, TunerError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Columns without which a trace cannot be interpreted at all
pub const REQUIRED_COLUMNS: &[&str] = &["name", "status"];

/// One data row keyed by header column
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// 1-based line number in the source file
    pub line: usize,
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new(line: usize, fields: HashMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Field value, or `None` when the column is absent from this row
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// Parsed contents of a single trace file
#[derive(Debug, Clone, Default)]
pub struct TraceTable {
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Parse tab-delimited trace content with a header row
///
/// Blank lines are skipped. Rows shorter than the header leave the trailing
/// columns absent; extra cells beyond the header are ignored.
pub fn parse_trace(content: &str) -> TraceTable {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.is_empty());

    let columns: Vec<String> = match lines.next() {
        Some((_, header)) => header.split('\t').map(str::to_string).collect(),
        None => return TraceTable::default(),
    };

    let records = lines
        .map(|(line_no, line)| {
            let fields = columns
                .iter()
                .cloned()
                .zip(line.split('\t').map(str::to_string))
                .collect();
            RawRecord::new(line_no, fields)
        })
        .collect();

    TraceTable { columns, records }
}

/// Read and parse a trace file, checking that the mandatory columns exist
pub fn read_trace(path: &Path) -> Result<TraceTable> {
    let content = fs::read_to_string(path).map_err(|source| TunerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_trace(&content);

    // An empty file has no header and no rows; nothing to validate
    if table.columns.is_empty() {
        return Ok(table);
    }
    for column in REQUIRED_COLUMNS {
        if !table.columns.iter().any(|c| c == column) {
            return Err(TunerError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }
    Ok(table)
}

/// Resolve the input path to the list of trace files to analyze
///
/// A file is used as-is. A directory yields every `*.txt` file whose name
/// contains `trace`, sorted by path.
pub fn discover_traces(input: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(input).map_err(|source| TunerError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let entries = fs::read_dir(input).map_err(|source| TunerError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let mut traces = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TunerError::Io {
            path: input.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if is_trace_file(&path) {
            traces.push(path);
        } else {
            debug!(path = %path.display(), "Skipping non-trace file");
        }
    }
    traces.sort();

    if traces.is_empty() {
        warn!(dir = %input.display(), "No trace files found in directory");
    }
    Ok(traces)
}

fn is_trace_file(path: &Path) -> bool {
    let is_txt = path.extension().map(|ext| ext == "txt").unwrap_or(false);
    let named_trace = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.contains("trace"))
        .unwrap_or(false);
    is_txt && named_trace && path.is_file()
}
