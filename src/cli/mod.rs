//! CLI definitions and handlers
//!
//! `matchrate` and `matchrate-compare` are separate binaries; each parses its
//! own arguments and shares nothing at runtime.

mod analyze;
pub mod compare;
pub mod output;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Install the stderr log subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Matchrate - agreement between human and AI issue ratings
#[derive(Parser, Debug)]
#[command(name = "matchrate")]
#[command(
    version,
    about = "Calculate AI vs user assessment match rates from a CSV file",
    long_about = "Compares human and AI ratings of severity, occurrence and priority. \
Both sides are normalized onto a shared vocabulary before comparison; rates are \
computed over rows where both sides have a value.",
    after_help = "\
Examples:
  matchrate issues.csv                          Print match rates
  matchrate issues.csv --detailed               Include rater-vs-rater cross-tabs
  matchrate issues.csv --output                 Save results with a timestamped name
  matchrate issues.csv --output-file run1.csv   Save results to run1.csv and run1.txt
  matchrate issues.csv --format json            JSON output for scripting"
)]
pub struct Cli {
    /// Path to the CSV file containing issue data
    pub csv_file: PathBuf,

    /// Show detailed breakdown of mismatches
    #[arg(long)]
    pub detailed: bool,

    /// Output results to CSV file with auto-generated filename
    #[arg(long)]
    pub output: bool,

    /// Output results to CSV file with specified filename
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Console output format: text, json
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Config file (default: ./matchrate.toml when present)
    #[arg(long, env = "MATCHRATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = LOG_LEVELS)]
    pub log_level: String,
}

/// Run the match-rate command
pub fn run(cli: Cli) -> Result<()> {
    let config = crate::config::load_config(cli.config.as_deref(), std::path::Path::new("."))?;
    analyze::run(
        &cli.csv_file,
        cli.detailed,
        cli.output,
        cli.output_file.as_deref(),
        cli.format.parse()?,
        &config,
    )
}
