//! Matchrate - agreement between human and AI issue ratings
//!
//! Reads a CSV of paired ratings and reports how often both raters agree on
//! severity, occurrence and priority.

use anyhow::Result;
use clap::Parser;
use matchrate::cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(&cli.log_level);
    cli::run(cli)
}
