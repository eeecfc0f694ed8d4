//! Match-rate command - compute agreement for one rating table

use super::output::{self, ResultPaths};
use crate::aggregate::{compute_with, Agreement};
use crate::config::MatchRateConfig;
use crate::reporters::{self, text, MatchReport, OutputFormat};
use crate::table::{self, RatingTable};
use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Run the match-rate computation and write the requested outputs
pub fn run(
    csv_file: &Path,
    detailed: bool,
    auto_output: bool,
    output_file: Option<&Path>,
    format: OutputFormat,
    config: &MatchRateConfig,
) -> Result<()> {
    let table = RatingTable::from_path(csv_file)
        .with_context(|| format!("Error processing CSV file {}", csv_file.display()))?;
    info!("Loaded {} issues from {}", table.len(), csv_file.display());
    if table.is_empty() {
        warn!("{} has no data rows; all rates will be 0", csv_file.display());
    }
    if format == OutputFormat::Text {
        println!(
            "Successfully loaded {} issues from {}",
            table.len(),
            style(csv_file.display()).cyan()
        );
    }

    let agreement = match compute_with(&table, &config.columns) {
        Ok(agreement) => agreement,
        Err(e) => {
            eprintln!("{} {}", style("Warning:").yellow().bold(), e);
            anyhow::bail!("Unable to calculate match rates. Please check your CSV format.");
        }
    };

    let report = MatchReport::new(&agreement, detailed);
    let rendered = reporters::report_with_format(&report, format)?;
    if format == OutputFormat::Text {
        println!();
    }
    println!("{}", rendered.trim_end());

    let target: Option<PathBuf> = if auto_output {
        let dir = &config.output.directory;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        Some(output::auto_results_path(csv_file, dir, &output::timestamp()))
    } else {
        output_file.map(Path::to_path_buf)
    };

    if let Some(path) = target {
        write_outputs(&ResultPaths::new(&path), &agreement, &report)?;
    }
    Ok(())
}

/// Write result files one after another; a failure stops the remaining
/// writes but leaves earlier files in place
fn write_outputs(paths: &ResultPaths, agreement: &Agreement, report: &MatchReport) -> Result<()> {
    table::write_results_csv(&paths.results_csv, &report.result)?;
    saved("Results", &paths.results_csv);

    std::fs::write(&paths.results_txt, text::render_results(&report.result))
        .with_context(|| format!("failed to write {}", paths.results_txt.display()))?;
    saved("Text results", &paths.results_txt);

    if let Some(breakdown) = &report.breakdown {
        table::write_detailed_csv(&paths.detailed_csv, agreement)?;
        saved("Detailed metrics", &paths.detailed_csv);

        std::fs::write(&paths.detailed_txt, text::render_breakdown(breakdown))
            .with_context(|| format!("failed to write {}", paths.detailed_txt.display()))?;
        saved("Detailed text breakdown", &paths.detailed_txt);
    }
    Ok(())
}

fn saved(what: &str, path: &Path) {
    eprintln!("{} saved to {}", what, style(path.display()).cyan());
}
