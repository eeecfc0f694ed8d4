//! Core data models for matchrate
//!
//! These models are shared by the normalizer, the aggregator, and the
//! comparison tooling.

use serde::{Deserialize, Serialize};

/// The three rated attributes of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Severity,
    Occurrence,
    Priority,
}

impl Attribute {
    pub fn all() -> &'static [Attribute] {
        &[Attribute::Severity, Attribute::Occurrence, Attribute::Priority]
    }

    /// Lowercase key used in column names (`user_severity`, `severity_match`)
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Severity => "severity",
            Attribute::Occurrence => "occurrence",
            Attribute::Priority => "priority",
        }
    }

    /// Title-case name used in reports and charts
    pub fn title(&self) -> &'static str {
        match self {
            Attribute::Severity => "Severity",
            Attribute::Occurrence => "Occurrence",
            Attribute::Priority => "Priority",
        }
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Who produced a rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rater {
    User,
    Ai,
}

impl Rater {
    pub fn key(&self) -> &'static str {
        match self {
            Rater::User => "user",
            Rater::Ai => "ai",
        }
    }
}

/// Canonical severity vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeverityLabel {
    Showstopper,
    Major,
    Minor,
    SafetyOnly,
}

/// Canonical occurrence (frequency) vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccurrenceLabel {
    Rare,
    Frequent,
    VeryFrequent,
    Certain,
}

/// Canonical priority vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityLabel {
    Blocker,
    Critical,
    Major,
    Minor,
}

/// A label from one of the closed per-attribute vocabularies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalLabel {
    Severity(SeverityLabel),
    Occurrence(OccurrenceLabel),
    Priority(PriorityLabel),
}

impl CanonicalLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalLabel::Severity(SeverityLabel::Showstopper) => "SHOWSTOPPER",
            CanonicalLabel::Severity(SeverityLabel::Major) => "MAJOR",
            CanonicalLabel::Severity(SeverityLabel::Minor) => "MINOR",
            CanonicalLabel::Severity(SeverityLabel::SafetyOnly) => "SAFETY-ONLY",
            CanonicalLabel::Occurrence(OccurrenceLabel::Rare) => "RARE",
            CanonicalLabel::Occurrence(OccurrenceLabel::Frequent) => "FREQUENT",
            CanonicalLabel::Occurrence(OccurrenceLabel::VeryFrequent) => "VERY FREQUENT",
            CanonicalLabel::Occurrence(OccurrenceLabel::Certain) => "CERTAIN",
            CanonicalLabel::Priority(PriorityLabel::Blocker) => "BLOCKER",
            CanonicalLabel::Priority(PriorityLabel::Critical) => "CRITICAL",
            CanonicalLabel::Priority(PriorityLabel::Major) => "MAJOR",
            CanonicalLabel::Priority(PriorityLabel::Minor) => "MINOR",
        }
    }
}

impl std::fmt::Display for CanonicalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of normalizing a non-null rating.
///
/// `Unrecognized` keeps the upper-cased input so two raters that wrote the
/// same unmapped text still compare equal, while it can never equal a
/// canonical label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Normalized {
    Canonical(CanonicalLabel),
    Unrecognized(String),
}

impl Normalized {
    pub fn as_str(&self) -> &str {
        match self {
            Normalized::Canonical(label) => label.as_str(),
            Normalized::Unrecognized(raw) => raw.as_str(),
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, Normalized::Canonical(_))
    }
}

impl std::fmt::Display for Normalized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reviewed issue: a rating pair per attribute. `None` is a missing cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub user_severity: Option<String>,
    pub ai_severity: Option<String>,
    pub user_occurrence: Option<String>,
    pub ai_occurrence: Option<String>,
    pub user_priority: Option<String>,
    pub ai_priority: Option<String>,
}

impl IssueRecord {
    pub fn rating(&self, attribute: Attribute, rater: Rater) -> Option<&str> {
        let value = match (attribute, rater) {
            (Attribute::Severity, Rater::User) => &self.user_severity,
            (Attribute::Severity, Rater::Ai) => &self.ai_severity,
            (Attribute::Occurrence, Rater::User) => &self.user_occurrence,
            (Attribute::Occurrence, Rater::Ai) => &self.ai_occurrence,
            (Attribute::Priority, Rater::User) => &self.user_priority,
            (Attribute::Priority, Rater::Ai) => &self.ai_priority,
        };
        value.as_deref()
    }
}

/// Summary agreement figures for one run.
///
/// Field names serialize to the column headers of the results CSV, which is
/// also what `matchrate-compare` reads back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "Severity Match Rate (%)")]
    pub severity_match_rate: f64,
    #[serde(rename = "Occurrence Match Rate (%)")]
    pub occurrence_match_rate: f64,
    #[serde(rename = "Priority Match Rate (%)")]
    pub priority_match_rate: f64,
    #[serde(rename = "Overall Match Rate (%)")]
    pub overall_match_rate: f64,
    #[serde(rename = "Total Issues Analyzed")]
    pub total_issues: usize,
    #[serde(rename = "Valid Severity Comparisons")]
    pub valid_severity: usize,
    #[serde(rename = "Valid Occurrence Comparisons")]
    pub valid_occurrence: usize,
    #[serde(rename = "Valid Priority Comparisons")]
    pub valid_priority: usize,
}

impl MatchResult {
    /// `(name, formatted value)` pairs in report order
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Severity Match Rate (%)", format!("{:.2}", self.severity_match_rate)),
            ("Occurrence Match Rate (%)", format!("{:.2}", self.occurrence_match_rate)),
            ("Priority Match Rate (%)", format!("{:.2}", self.priority_match_rate)),
            ("Overall Match Rate (%)", format!("{:.2}", self.overall_match_rate)),
            ("Total Issues Analyzed", self.total_issues.to_string()),
            ("Valid Severity Comparisons", self.valid_severity.to_string()),
            ("Valid Occurrence Comparisons", self.valid_occurrence.to_string()),
            ("Valid Priority Comparisons", self.valid_priority.to_string()),
        ]
    }
}

/// Match rates of one measurement run, as consumed by the comparison chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub label: String,
    pub severity: f64,
    pub occurrence: f64,
    pub priority: f64,
}

impl Measurement {
    pub fn rate(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Severity => self.severity,
            Attribute::Occurrence => self.occurrence,
            Attribute::Priority => self.priority,
        }
    }
}

/// Round to two decimal places for reporting, ties to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_never_equals_canonical() {
        let canonical = Normalized::Canonical(CanonicalLabel::Priority(PriorityLabel::Major));
        let raw = Normalized::Unrecognized("MAJOR".into());
        assert_ne!(canonical, raw);
        assert_eq!(canonical.as_str(), raw.as_str());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(100.0), 100.0);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_round2_ties_to_even() {
        // 1 of 32 is exactly 3.125
        assert_eq!(round2(1.0 / 32.0 * 100.0), 3.12);
        assert_eq!(round2(3.375), 3.38);
        assert_eq!(round2(12.5), 12.5);
    }

    #[test]
    fn test_match_result_fields_order() {
        let result = MatchResult {
            severity_match_rate: 50.0,
            total_issues: 4,
            ..Default::default()
        };
        let fields = result.fields();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0], ("Severity Match Rate (%)", "50.00".to_string()));
        assert_eq!(fields[4], ("Total Issues Analyzed", "4".to_string()));
    }
}
