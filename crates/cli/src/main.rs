//! Nextflow trace tuner CLI
//!
//! Analyzes Nextflow execution traces and suggests per-process resource
//! settings plus a concurrency-aware allocation for the head job.

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tuner_lib::{emit, AnalysisOptions, Executor};

/// Nextflow trace efficiency analyzer with concurrency-aware head sizing
#[derive(Parser)]
#[command(name = "nf-tuner")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Path to Nextflow trace file or directory containing trace files
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Minimum number of tasks per process to be considered in evaluation
    #[arg(long, default_value_t = 1)]
    pub min_tasks: usize,

    /// Path to output analysis report
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Path to output Nextflow config file with recommended settings
    #[arg(long, value_name = "PATH")]
    pub config_out: Option<PathBuf>,

    /// Default executor type for the workflow (used for job array recommendations)
    #[arg(long, value_enum)]
    pub default_executor: Option<ExecutorArg>,

    /// Thresholds file (defaults to ~/.config/nf-tuner/config.toml when present)
    #[arg(long, env = "NF_TUNER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Summary output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,
}

/// Executors accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutorArg {
    Slurm,
    Pbs,
    Local,
}

impl From<ExecutorArg> for Executor {
    fn from(arg: ExecutorArg) -> Self {
        match arg {
            ExecutorArg::Slurm => Executor::Slurm,
            ExecutorArg::Pbs => Executor::Pbs,
            ExecutorArg::Local => Executor::Local,
        }
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let thresholds = config::load_thresholds(cli.config.as_deref())?;
    let options = AnalysisOptions {
        min_tasks: cli.min_tasks,
        default_executor: cli.default_executor.map(Executor::from),
        thresholds,
    };
    info!(input = %cli.input.display(), min_tasks = options.min_tasks, "Starting analysis");

    let analysis = tuner_lib::analyze_path(&cli.input, &options)
        .with_context(|| format!("Failed to analyze {}", cli.input.display()))?;

    let mut notes = Vec::new();
    if let Some(path) = &cli.out {
        emit::write_report(&analysis, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        notes.push(output::Note::Success(format!("Report written to {}", path.display())));
    }
    if let Some(path) = &cli.config_out {
        let written = emit::write_config(&analysis.config, &cli.input, path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        notes.push(if written {
            output::Note::Success(format!("Config written to {}", path.display()))
        } else {
            output::Note::Info("No tuning directives; config not written".to_string())
        });
    }

    output::print_summary(&analysis, cli.format)?;
    output::print_notes(&notes, cli.format);
    Ok(())
}
