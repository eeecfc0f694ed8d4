//! CSV input and output
//!
//! The rating table is read as plain strings; interpretation of the cells is
//! left to the normalizer. Writers here produce the results CSV and the
//! row-level detailed CSV of a match-rate run.

use crate::aggregate::Agreement;
use crate::models::{Attribute, MatchResult, Rater};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A delimited table with a header row, cells kept as raw text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RatingTable {
    /// Build a table from string slices (mostly for tests and fixtures)
    pub fn from_rows(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)
            .with_context(|| format!("failed to open CSV {}", path.display()))?;
        let table = Self::from_reader(file)
            .with_context(|| format!("failed to read CSV {}", path.display()))?;
        debug!(
            "Read {} rows x {} columns from {}",
            table.len(),
            table.columns.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let columns = reader
            .headers()
            .context("failed to read CSV header")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.context("failed to read CSV record")?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell text, or `None` for a short row or an empty cell
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// Write the single-row results CSV
pub fn write_results_csv(path: &Path, result: &MatchResult) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create results CSV {}", path.display()))?;
    writer
        .serialize(result)
        .context("failed to write results CSV row")?;
    writer.flush().context("failed to flush results CSV writer")
}

/// Header of the detailed CSV, in column order
pub fn detailed_header() -> Vec<String> {
    let mut header = Vec::new();
    for attribute in Attribute::all() {
        for rater in [Rater::User, Rater::Ai] {
            header.push(format!("{}_{}", rater.key(), attribute.key()));
        }
    }
    for attribute in Attribute::all() {
        for rater in [Rater::User, Rater::Ai] {
            header.push(format!("{}_{}_std", rater.key(), attribute.key()));
        }
    }
    for attribute in Attribute::all() {
        header.push(format!("{}_match", attribute.key()));
    }
    header.push("all_match".to_string());
    header
}

/// Write one row per issue: original ratings, canonical labels, match flags
pub fn write_detailed_csv(path: &Path, agreement: &Agreement) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create detailed CSV {}", path.display()))?;
    writer
        .write_record(detailed_header())
        .context("failed to write detailed CSV header")?;

    for row in agreement.rows() {
        let mut record: Vec<String> = Vec::new();
        for attribute in Attribute::all() {
            for rater in [Rater::User, Rater::Ai] {
                record.push(row.record.rating(*attribute, rater).unwrap_or("").to_string());
            }
        }
        for attribute in Attribute::all() {
            let comparison = row.comparison(*attribute);
            for side in [&comparison.user, &comparison.ai] {
                record.push(side.as_ref().map(|n| n.to_string()).unwrap_or_default());
            }
        }
        for attribute in Attribute::all() {
            record.push(row.comparison(*attribute).is_match().to_string());
        }
        record.push(row.all_match().to_string());
        writer
            .write_record(&record)
            .context("failed to write detailed CSV row")?;
    }
    writer.flush().context("failed to flush detailed CSV writer")
}
