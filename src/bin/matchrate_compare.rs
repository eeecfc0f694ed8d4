//! Matchrate compare - chart match rates across measurement runs

use anyhow::Result;
use clap::Parser;
use matchrate::cli::{self, compare::CompareCli};

fn main() -> Result<()> {
    let cli = CompareCli::parse();
    cli::init_logging(&cli.log_level);
    cli::compare::run(cli)
}
