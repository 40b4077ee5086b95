//! Plain text analysis report

use super::write_output;
use crate::error::Result;
use crate::recommender::{Analysis, HeadAllocation};
use std::fmt::Write;
use std::path::Path;

/// Format a number with at least one decimal place (`2.0`, `0.17`)
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Render the report: one block per process, then head job sizing if any
/// process qualified for local execution
pub fn render_report(analysis: &Analysis) -> String {
    let mut out = String::new();

    for row in &analysis.rows {
        let _ = writeln!(out, "\n### {}", row.process);
        let _ = writeln!(out, "Tasks: {}", row.tasks);
        let _ = writeln!(out, "Median runtime (min): {}", format_decimal(row.runtime_median_min));
        let _ = writeln!(out, "Recommendations: {}", row.summary());
    }

    if let Some(head) = &analysis.head_allocation {
        render_head_allocation(&mut out, head);
    }
    out
}

fn render_head_allocation(out: &mut String, head: &HeadAllocation) {
    let _ = writeln!(out, "\n=== Head job resource recommendation (concurrency-aware) ===");
    let _ = writeln!(out, "Based on observed overlap of local-executor tasks:\n");
    let _ = writeln!(out, "  Estimated peak local concurrency: {}", head.peak_concurrency);
    let _ = writeln!(
        out,
        "  Per-task requirement: {} cpus, {} GB\n",
        head.per_task_cpus, head.per_task_memory_gb
    );
    let _ = writeln!(out, "Recommended head job allocation:");
    let _ = writeln!(out, "  cpus   >= {}", head.cpus);
    let _ = writeln!(out, "  memory >= {} GB", head.memory_gb);
    let _ = writeln!(
        out,
        "\n(Set executor.local.cpus/memory to enforce this limit explicitly.)"
    );
}

pub fn write_report(analysis: &Analysis, path: &Path) -> Result<()> {
    write_output(path, &render_report(analysis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessRow;

    fn row(name: &str, recommendations: &[&str]) -> ProcessRow {
        ProcessRow {
            process: name.to_string(),
            tasks: 2,
            runtime_median_min: 0.25,
            local_eligible: true,
            recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
            directives: vec![],
        }
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(2.0), "2.0");
        assert_eq!(format_decimal(0.17), "0.17");
        assert_eq!(format_decimal(13.73), "13.73");
    }

    #[test]
    fn test_rows_only() {
        let analysis = Analysis {
            rows: vec![row("QC", &[]), row("ALIGN", &["A", "B"])],
            ..Default::default()
        };
        let report = render_report(&analysis);
        assert_eq!(
            report,
            "\n### QC\nTasks: 2\nMedian runtime (min): 0.25\nRecommendations: Looks efficient\n\
             \n### ALIGN\nTasks: 2\nMedian runtime (min): 0.25\nRecommendations: A; B\n"
        );
    }

    #[test]
    fn test_head_section() {
        let analysis = Analysis {
            rows: vec![row("QC", &[])],
            head_allocation: Some(HeadAllocation {
                peak_concurrency: 3,
                per_task_cpus: 2.0,
                per_task_memory_gb: 4,
                cpus: 6.0,
                memory_gb: 12,
            }),
            ..Default::default()
        };
        let report = render_report(&analysis);
        assert!(report.contains("=== Head job resource recommendation (concurrency-aware) ==="));
        assert!(report.contains("  Estimated peak local concurrency: 3\n"));
        assert!(report.contains("  Per-task requirement: 2 cpus, 4 GB\n\n"));
        assert!(report.contains("  cpus   >= 6\n"));
        assert!(report.contains("  memory >= 12 GB\n"));
        assert!(report.ends_with("(Set executor.local.cpus/memory to enforce this limit explicitly.)\n"));
    }
}
