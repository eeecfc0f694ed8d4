//! Compare command - chart match rates from several runs side by side

use super::output;
use super::LOG_LEVELS;
use crate::compare::{self, chart, manual, ComparisonTable};
use crate::config::{load_config, MatchRateConfig};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Matchrate compare - visual comparison of match rate measurements
#[derive(Parser, Debug)]
#[command(name = "matchrate-compare")]
#[command(
    version,
    about = "Create a visual comparison of match rate measurements",
    after_help = "\
Examples:
  matchrate-compare --files run1.txt run2.csv --labels Baseline Tuned
  matchrate-compare --files a.txt b.txt --output chart.svg
  matchrate-compare --manual                    Enter rates by hand"
)]
pub struct CompareCli {
    /// Match rate files written by matchrate (.txt or .csv)
    #[arg(long, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Labels for each measurement, in file order
    #[arg(long, num_args = 1..)]
    pub labels: Vec<String>,

    /// Enter measurements manually
    #[arg(long)]
    pub manual: bool,

    /// Output path for the chart (SVG); the comparison CSV is written beside it
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Config file (default: ./matchrate.toml when present)
    #[arg(long, env = "MATCHRATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = LOG_LEVELS)]
    pub log_level: String,
}

/// Run the compare command
pub fn run(cli: CompareCli) -> Result<()> {
    let config = load_config(cli.config.as_deref(), Path::new("."))?;

    let mut measurements = compare::load_measurements(&cli.files, &cli.labels);
    if cli.manual || measurements.is_empty() {
        // Labels past the file list belong to entered measurements
        let entered = manual::prompt_measurements(cli.files.len(), &cli.labels)?;
        measurements.extend(entered);
    }
    let table = ComparisonTable::new(measurements)?;

    let chart_path = chart_output_path(cli.output.as_deref(), &config)?;
    write_chart(&table, &chart_path, &config)?;

    println!("\n{}", table.render().trim_end());

    let csv_path = chart_path.with_extension("csv");
    table.write_csv(&csv_path)?;
    println!(
        "Comparison table saved to {}",
        style(csv_path.display()).cyan()
    );
    Ok(())
}

/// Resolve where the chart goes; the extension is always `.svg`
fn chart_output_path(explicit: Option<&Path>, config: &MatchRateConfig) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            let is_svg = path
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
            if !is_svg {
                warn!(
                    "Charts are rendered as SVG; writing {} instead of {}",
                    path.with_extension("svg").display(),
                    path.display()
                );
            }
            Ok(path.with_extension("svg"))
        }
        None => {
            let dir = &config.output.directory;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory {}", dir.display()))?;
            Ok(output::auto_chart_path(dir, &output::timestamp()))
        }
    }
}

fn write_chart(table: &ComparisonTable, path: &Path, config: &MatchRateConfig) -> Result<()> {
    let layout = chart::ChartLayout::new(table, &config.chart);
    std::fs::write(path, chart::render_svg(&layout))
        .with_context(|| format!("failed to write chart {}", path.display()))?;
    info!("Chart with {} measurements written", table.measurements().len());
    println!("Visualization saved to {}", style(path.display()).cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        CompareCli::command().debug_assert();
    }

    #[test]
    fn test_parse_lists() {
        let cli = CompareCli::try_parse_from([
            "matchrate-compare",
            "--files",
            "a.txt",
            "b.csv",
            "--labels",
            "Base",
            "Tuned",
            "-o",
            "chart.svg",
        ])
        .unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.csv")]);
        assert_eq!(cli.labels, vec!["Base".to_string(), "Tuned".to_string()]);
        assert_eq!(cli.output, Some(PathBuf::from("chart.svg")));
        assert!(!cli.manual);
    }

    #[test]
    fn test_explicit_output_forced_to_svg() {
        let config = MatchRateConfig::default();
        let path = chart_output_path(Some(Path::new("out/chart.png")), &config).unwrap();
        assert_eq!(path, PathBuf::from("out/chart.svg"));
    }
}
