//! Renderers for analysis output
//!
//! - Plain text report with per-process advice and head job sizing
//! - Nextflow config file with one `withName` scope per tuned process

mod config_file;
mod report;

pub use config_file::{render_config, write_config};
pub use report::{format_decimal, render_report, write_report};

use crate::error::{Result, TunerError};
use std::path::Path;

fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| TunerError::Io {
        path: path.to_path_buf(),
        source,
    })
}
