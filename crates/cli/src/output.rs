//! Terminal output for analysis summaries

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use tuner_lib::emit::format_decimal;
use tuner_lib::{Analysis, HeadAllocation, ProcessRow};

/// Output format for the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Status line printed after the summary
#[derive(Debug, Clone)]
pub enum Note {
    Success(String),
    Info(String),
}

/// Row for the process summary table
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Process")]
    process: String,
    #[tabled(rename = "Tasks")]
    tasks: usize,
    #[tabled(rename = "Median (min)")]
    runtime: String,
    #[tabled(rename = "Local")]
    local: String,
    #[tabled(rename = "Recommendations")]
    recommendations: String,
}

impl From<&ProcessRow> for SummaryRow {
    fn from(row: &ProcessRow) -> Self {
        Self {
            process: row.process.clone(),
            tasks: row.tasks,
            runtime: format_decimal(row.runtime_median_min),
            local: if row.local_eligible {
                "✓".to_string()
            } else {
                String::new()
            },
            recommendations: color_summary(row),
        }
    }
}

/// Print the analysis summary to stdout
pub fn print_summary(analysis: &Analysis, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(analysis)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            if analysis.rows.is_empty() {
                print_warning("No task types met the minimum task count");
                return Ok(());
            }

            let rows: Vec<SummaryRow> = analysis.rows.iter().map(SummaryRow::from).collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);
            println!("\nTotal: {} task types", analysis.rows.len());

            if let Some(head) = &analysis.head_allocation {
                print_head_allocation(head);
            }
        }
    }
    Ok(())
}

fn print_head_allocation(head: &HeadAllocation) {
    println!();
    println!("{}", "Head job allocation (concurrency-aware)".bold());
    println!("{}", "-".repeat(50));
    println!("Peak local concurrency: {}", head.peak_concurrency.to_string().cyan());
    println!(
        "Per-task requirement:   {} cpus, {} GB",
        head.per_task_cpus, head.per_task_memory_gb
    );
    println!(
        "Recommended:            cpus >= {}, memory >= {} GB",
        head.cpus.to_string().green(),
        head.memory_gb.to_string().green()
    );
}

/// Print status notes; suppressed for JSON so stdout stays parseable
pub fn print_notes(notes: &[Note], format: OutputFormat) {
    if format == OutputFormat::Json {
        return;
    }
    for note in notes {
        match note {
            Note::Success(message) => print_success(message),
            Note::Info(message) => print_info(message),
        }
    }
}

fn color_summary(row: &ProcessRow) -> String {
    let summary = row.summary();
    if row.recommendations.is_empty() {
        summary.green().to_string()
    } else {
        summary
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_row_conversion() {
        colored::control::set_override(false);
        let row = ProcessRow {
            process: "QC".to_string(),
            tasks: 4,
            runtime_median_min: 2.0,
            local_eligible: true,
            recommendations: vec![],
            directives: vec![],
        };
        let summary = SummaryRow::from(&row);
        assert_eq!(summary.runtime, "2.0");
        assert_eq!(summary.local, "✓");
        assert_eq!(summary.recommendations, "Looks efficient");
    }
}
