//! Comparison of match rates across measurement runs
//!
//! Reads back the results written by `matchrate` (the `.txt` report or the
//! results `.csv`), or takes rates entered by hand, and builds a pivoted
//! comparison table plus a grouped bar chart. Nothing here recomputes rates;
//! the given percentages are trusted as-is.

pub mod chart;
pub mod manual;

use crate::models::{Attribute, Measurement};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::{Path, PathBuf};
use tabled::settings::{object::Columns, Alignment, Modify, Style};
use tabled::{Table, Tabled};
use thiserror::Error;
use tracing::{debug, warn};

/// Row label of the per-attribute mean in the comparison table
pub const AVERAGE_LABEL: &str = "AVERAGE";

/// Errors raised while assembling a comparison
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    #[error("No data provided for visualization")]
    NoData,

    #[error("Could not convert {attribute} match rate '{value}' to a number for {label}")]
    Conversion {
        label: String,
        attribute: Attribute,
        value: String,
    },
}

/// Raw rate values recovered from a results file, before numeric conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateRecord {
    pub severity: Option<String>,
    pub occurrence: Option<String>,
    pub priority: Option<String>,
}

impl RateRecord {
    pub fn is_empty(&self) -> bool {
        self.severity.is_none() && self.occurrence.is_none() && self.priority.is_none()
    }

    fn slot(&mut self, attribute: Attribute) -> &mut Option<String> {
        match attribute {
            Attribute::Severity => &mut self.severity,
            Attribute::Occurrence => &mut self.occurrence,
            Attribute::Priority => &mut self.priority,
        }
    }

    fn get(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Severity => self.severity.as_deref(),
            Attribute::Occurrence => self.occurrence.as_deref(),
            Attribute::Priority => self.priority.as_deref(),
        }
    }

    /// Convert to a measurement. An absent field counts as 0; a field that is
    /// not a number rejects the whole measurement.
    pub fn to_measurement(&self, label: &str) -> Result<Measurement, CompareError> {
        let parse = |attribute: Attribute| -> Result<f64, CompareError> {
            match self.get(attribute) {
                None => Ok(0.0),
                Some(value) => value.trim().parse().map_err(|_| CompareError::Conversion {
                    label: label.to_string(),
                    attribute,
                    value: value.to_string(),
                }),
            }
        };
        Ok(Measurement {
            label: label.to_string(),
            severity: parse(Attribute::Severity)?,
            occurrence: parse(Attribute::Occurrence)?,
            priority: parse(Attribute::Priority)?,
        })
    }
}

/// Default label for the measurement at `index` (0-based)
pub fn default_label(index: usize) -> String {
    format!("Measurement {}", index + 1)
}

/// Extract rates from the text report: lines such as
/// `Severity Match Rate (%): 85.5`
pub fn parse_txt(content: &str) -> RateRecord {
    let mut record = RateRecord::default();
    for line in content.lines() {
        for attribute in Attribute::all() {
            let marker = format!("{} Match Rate", attribute.title());
            if line.contains(&marker) {
                if let Some(value) = line.split(':').nth(1) {
                    *record.slot(*attribute) = Some(value.trim().to_string());
                }
            }
        }
    }
    record
}

/// Extract rates from a results CSV: the first data row of the first column
/// whose name mentions the attribute, "match" and "rate"
pub fn parse_csv<R: std::io::Read>(reader: R) -> Result<RateRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("failed to read CSV header")?
        .iter()
        .map(|h| h.to_lowercase())
        .collect();
    let first = match reader.records().next() {
        Some(record) => record.context("failed to read CSV record")?,
        None => return Ok(RateRecord::default()),
    };

    let mut record = RateRecord::default();
    for attribute in Attribute::all() {
        let column = headers.iter().position(|h| {
            h.contains(attribute.key()) && h.contains("match") && h.contains("rate")
        });
        if let Some(value) = column
            .and_then(|i| first.get(i))
            .filter(|v| !v.trim().is_empty())
        {
            *record.slot(*attribute) = Some(value.to_string());
        }
    }
    Ok(record)
}

/// Read one results file, choosing the parser by extension
pub fn read_rate_file(path: &Path) -> Result<RateRecord> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match extension.as_deref() {
        Some("txt") => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(parse_txt(&content))
        }
        Some("csv") => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            parse_csv(file).with_context(|| format!("failed to parse CSV file {}", path.display()))
        }
        _ => anyhow::bail!("Unsupported file format: {}", path.display()),
    }
}

/// Load one measurement per usable file.
///
/// `labels[i]` names the measurement from `files[i]`; without one the file
/// name is used. Files that cannot be read, yield no rates, or hold a
/// non-numeric rate are skipped with a warning.
pub fn load_measurements(files: &[PathBuf], labels: &[String]) -> Vec<Measurement> {
    let mut measurements = Vec::new();
    for (i, path) in files.iter().enumerate() {
        let record = match read_rate_file(path) {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                continue;
            }
        };
        if record.is_empty() {
            warn!("No match rates found in {}, skipping", path.display());
            continue;
        }

        let label = labels.get(i).cloned().unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| default_label(i))
        });
        match record.to_measurement(&label) {
            Ok(measurement) => {
                debug!("Loaded {} from {}", label, path.display());
                measurements.push(measurement);
            }
            Err(e) => warn!("{}, skipping", e),
        }
    }
    measurements
}

/// One printed row of the comparison grid
#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "Measurement")]
    label: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Occurrence")]
    occurrence: String,
    #[tabled(rename = "Priority")]
    priority: String,
}

/// Measurements pivoted into rows, with per-attribute averages
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    measurements: Vec<Measurement>,
}

impl ComparisonTable {
    pub fn new(measurements: Vec<Measurement>) -> Result<Self, CompareError> {
        if measurements.is_empty() {
            return Err(CompareError::NoData);
        }
        Ok(Self { measurements })
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Mean of one attribute across all measurements
    pub fn average(&self, attribute: Attribute) -> f64 {
        let sum: f64 = self.measurements.iter().map(|m| m.rate(attribute)).sum();
        sum / self.measurements.len() as f64
    }

    /// Mean of the three attribute averages
    pub fn overall_average(&self) -> f64 {
        let attributes = Attribute::all();
        attributes.iter().map(|a| self.average(*a)).sum::<f64>() / attributes.len() as f64
    }

    /// The measurement rows followed by the AVERAGE row
    pub fn rows(&self) -> Vec<(String, [f64; 3])> {
        let mut rows: Vec<(String, [f64; 3])> = self
            .measurements
            .iter()
            .map(|m| {
                (
                    m.label.clone(),
                    [m.severity, m.occurrence, m.priority],
                )
            })
            .collect();
        rows.push((
            AVERAGE_LABEL.to_string(),
            [
                self.average(Attribute::Severity),
                self.average(Attribute::Occurrence),
                self.average(Attribute::Priority),
            ],
        ));
        rows
    }

    /// Text table plus the key insights, values to two decimals
    pub fn render(&self) -> String {
        let rows = self.rows().into_iter().map(|(label, values)| ComparisonRow {
            label,
            severity: format!("{:.2}", values[0]),
            occurrence: format!("{:.2}", values[1]),
            priority: format!("{:.2}", values[2]),
        });
        let mut grid = Table::new(rows);
        grid.with(Style::psql())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

        let mut out = String::from("=== DETAILED COMPARISON ===\n\n");
        out.push_str(&grid.to_string());
        out.push('\n');
        out.push_str("\nKey Insights:\n");
        for attribute in Attribute::all() {
            out.push_str(&format!(
                "- Average {} Match Rate: {:.2}%\n",
                attribute.title(),
                self.average(*attribute)
            ));
        }
        out.push_str(&format!(
            "- Overall Average Match Rate: {:.2}%\n",
            self.overall_average()
        ));
        out
    }

    /// Write the pivoted table (values rounded to two decimals)
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .from_path(path)
            .with_context(|| format!("failed to create comparison CSV {}", path.display()))?;
        let mut header = vec!["Measurement".to_string()];
        header.extend(Attribute::all().iter().map(|a| a.title().to_string()));
        writer
            .write_record(&header)
            .context("failed to write comparison CSV header")?;
        for (label, values) in self.rows() {
            let mut record = vec![label];
            record.extend(values.iter().map(|v| format!("{:.2}", v)));
            writer
                .write_record(&record)
                .context("failed to write comparison CSV row")?;
        }
        writer.flush().context("failed to flush comparison CSV writer")
    }
}
