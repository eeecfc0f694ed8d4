//! Agreement aggregation
//!
//! Normalizes both sides of every attribute for every row of a rating table
//! and derives per-attribute and composite match rates plus cross-tabs.
//!
//! A row's attribute is a *valid comparison* when both canonical values are
//! non-null, and a *match* when they are also equal. Rows with a null on one
//! side still count toward the total number of issues.

mod crosstab;

pub use crosstab::{CrossTab, MARGIN_LABEL};

use crate::config::ColumnNames;
use crate::models::{round2, Attribute, IssueRecord, MatchResult, Normalized, Rater};
use crate::normalize::normalize;
use crate::table::RatingTable;
use thiserror::Error;
use tracing::debug;

/// Errors that stop an aggregation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgreementError {
    #[error("Missing columns in CSV: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },
}

/// Both raters' canonical values for one attribute of one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub user: Option<Normalized>,
    pub ai: Option<Normalized>,
}

impl Comparison {
    pub fn new(attribute: Attribute, record: &IssueRecord) -> Self {
        Self {
            user: normalize(attribute, record.rating(attribute, Rater::User)),
            ai: normalize(attribute, record.rating(attribute, Rater::Ai)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.user.is_some() && self.ai.is_some()
    }

    pub fn is_match(&self) -> bool {
        match (&self.user, &self.ai) {
            (Some(user), Some(ai)) => user == ai,
            _ => false,
        }
    }
}

/// One issue with its derived canonical values and match flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowComparison {
    pub record: IssueRecord,
    pub severity: Comparison,
    pub occurrence: Comparison,
    pub priority: Comparison,
}

impl RowComparison {
    pub fn new(record: IssueRecord) -> Self {
        Self {
            severity: Comparison::new(Attribute::Severity, &record),
            occurrence: Comparison::new(Attribute::Occurrence, &record),
            priority: Comparison::new(Attribute::Priority, &record),
            record,
        }
    }

    pub fn comparison(&self, attribute: Attribute) -> &Comparison {
        match attribute {
            Attribute::Severity => &self.severity,
            Attribute::Occurrence => &self.occurrence,
            Attribute::Priority => &self.priority,
        }
    }

    /// All six canonical values are non-null
    pub fn all_valid(&self) -> bool {
        Attribute::all().iter().all(|a| self.comparison(*a).is_valid())
    }

    pub fn all_match(&self) -> bool {
        Attribute::all().iter().all(|a| self.comparison(*a).is_match())
    }
}

/// Result of one aggregation run
#[derive(Debug, Clone, PartialEq)]
pub struct Agreement {
    result: MatchResult,
    rows: Vec<RowComparison>,
}

impl Agreement {
    pub fn from_records(records: Vec<IssueRecord>) -> Self {
        let rows: Vec<RowComparison> = records.into_iter().map(RowComparison::new).collect();
        let result = summarize(&rows);
        Self { result, rows }
    }

    pub fn result(&self) -> &MatchResult {
        &self.result
    }

    pub fn rows(&self) -> &[RowComparison] {
        &self.rows
    }

    /// Cross-tab of user vs AI canonical labels, rows with a null on either
    /// side excluded
    pub fn crosstab(&self, attribute: Attribute) -> CrossTab {
        let pairs = self.rows.iter().filter_map(|row| {
            let comparison = row.comparison(attribute);
            match (&comparison.user, &comparison.ai) {
                (Some(user), Some(ai)) => Some((user.as_str(), ai.as_str())),
                _ => None,
            }
        });
        CrossTab::from_pairs(attribute, pairs)
    }

    pub fn crosstabs(&self) -> Vec<CrossTab> {
        Attribute::all().iter().map(|a| self.crosstab(*a)).collect()
    }
}

/// Compute agreement using the default column names
pub fn compute(table: &RatingTable) -> Result<Agreement, AgreementError> {
    compute_with(table, &ColumnNames::default())
}

/// Compute agreement, reading the six ratings from the named columns
pub fn compute_with(
    table: &RatingTable,
    columns: &ColumnNames,
) -> Result<Agreement, AgreementError> {
    let records = issue_records(table, columns)?;
    let agreement = Agreement::from_records(records);
    debug!(
        "Aggregated {} rows ({} fully comparable)",
        agreement.rows.len(),
        agreement.rows.iter().filter(|r| r.all_valid()).count()
    );
    Ok(agreement)
}

/// Extract the six rating columns, failing if any is absent
fn issue_records(
    table: &RatingTable,
    columns: &ColumnNames,
) -> Result<Vec<IssueRecord>, AgreementError> {
    let missing: Vec<String> = columns
        .required()
        .into_iter()
        .filter(|name| table.column_index(name).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(AgreementError::MissingColumns { columns: missing });
    }

    let index = |attribute, rater| {
        table
            .column_index(columns.get(attribute, rater))
            .unwrap_or_default()
    };
    let us = index(Attribute::Severity, Rater::User);
    let ais = index(Attribute::Severity, Rater::Ai);
    let uo = index(Attribute::Occurrence, Rater::User);
    let aio = index(Attribute::Occurrence, Rater::Ai);
    let up = index(Attribute::Priority, Rater::User);
    let aip = index(Attribute::Priority, Rater::Ai);

    let cell = |row, column| table.cell(row, column).map(str::to_string);
    Ok((0..table.len())
        .map(|row| IssueRecord {
            user_severity: cell(row, us),
            ai_severity: cell(row, ais),
            user_occurrence: cell(row, uo),
            ai_occurrence: cell(row, aio),
            user_priority: cell(row, up),
            ai_priority: cell(row, aip),
        })
        .collect())
}

/// Per-attribute tallies
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    valid: usize,
    matched: usize,
}

impl Tally {
    fn rate(&self) -> f64 {
        percentage(self.matched, self.valid)
    }
}

fn summarize(rows: &[RowComparison]) -> MatchResult {
    let mut severity = Tally::default();
    let mut occurrence = Tally::default();
    let mut priority = Tally::default();
    let mut composite = Tally::default();

    for row in rows {
        for (tally, comparison) in [
            (&mut severity, &row.severity),
            (&mut occurrence, &row.occurrence),
            (&mut priority, &row.priority),
        ] {
            if comparison.is_valid() {
                tally.valid += 1;
            }
            if comparison.is_match() {
                tally.matched += 1;
            }
        }
        if row.all_valid() {
            composite.valid += 1;
            if row.all_match() {
                composite.matched += 1;
            }
        }
    }

    MatchResult {
        severity_match_rate: severity.rate(),
        occurrence_match_rate: occurrence.rate(),
        priority_match_rate: priority.rate(),
        overall_match_rate: composite.rate(),
        total_issues: rows.len(),
        valid_severity: severity.valid,
        valid_occurrence: occurrence.valid,
        valid_priority: priority.valid,
    }
}

/// `part / whole * 100` rounded to two decimals, 0 when `whole` is 0
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}
