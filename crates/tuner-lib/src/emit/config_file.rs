//! Nextflow config rendering

use super::write_output;
use crate::error::Result;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// Render one `withName` scope per process, in name order
pub fn render_config(config: &BTreeMap<String, Vec<String>>, source: &Path) -> String {
    let mut out = String::new();
    out.push_str("// Auto-generated Nextflow tuning config\n");
    let _ = writeln!(out, "// Source trace: {}\n", source.display());
    out.push_str("process {\n\n");
    for (name, lines) in config {
        let _ = writeln!(out, "  withName: '{}' {{", name);
        for line in lines {
            let _ = writeln!(out, "    {}", line);
        }
        out.push_str("  }\n\n");
    }
    out.push_str("}\n");
    out
}

/// Write the config file; nothing is written when no process has directives
///
/// Returns whether a file was written.
pub fn write_config(
    config: &BTreeMap<String, Vec<String>>,
    source: &Path,
    path: &Path,
) -> Result<bool> {
    if config.is_empty() {
        return Ok(false);
    }
    write_output(path, &render_config(config, source))?;
    Ok(true)
}
