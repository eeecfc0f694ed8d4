//! Rating normalization
//!
//! Maps the free-text ratings written by each rater onto the shared canonical
//! vocabulary of its attribute so the two sides can be compared for equality.
//!
//! Matching rules per attribute:
//! - severity: substring match, first pattern wins
//! - occurrence: exact match, then a numeric bucket for percentages
//! - priority: exact match
//!
//! Anything that maps nowhere comes back as [`Normalized::Unrecognized`]
//! carrying the upper-cased input.

use crate::models::{
    Attribute, CanonicalLabel, Normalized, OccurrenceLabel, PriorityLabel, SeverityLabel,
};

/// Severity codes as written by the AI rater. Order matters.
const SEVERITY_CODES: &[(&str, SeverityLabel)] = &[
    ("CRITICAL (A)", SeverityLabel::Showstopper),
    ("MAJOR (B)", SeverityLabel::Major),
    ("MINOR (C)", SeverityLabel::Minor),
    ("SAFETY", SeverityLabel::SafetyOnly),
];

/// Canonical severity names, also matched as substrings ("A - SHOWSTOPPER").
const SEVERITY_NAMES: &[(&str, SeverityLabel)] = &[
    ("SHOWSTOPPER", SeverityLabel::Showstopper),
    ("MAJOR", SeverityLabel::Major),
    ("MINOR", SeverityLabel::Minor),
    ("SAFETY-ONLY", SeverityLabel::SafetyOnly),
];

/// Bare letter grades, tried last.
const SEVERITY_GRADES: &[(&str, SeverityLabel)] = &[
    ("(A)", SeverityLabel::Showstopper),
    ("(B)", SeverityLabel::Major),
    ("(C)", SeverityLabel::Minor),
];

const OCCURRENCE_TOKENS: &[(&str, OccurrenceLabel)] = &[
    ("CERTAIN", OccurrenceLabel::Certain),
    ("VERY FREQUENT", OccurrenceLabel::VeryFrequent),
    ("FREQUENT", OccurrenceLabel::Frequent),
    ("RARE", OccurrenceLabel::Rare),
];

const OCCURRENCE_SYNONYMS: &[(&str, OccurrenceLabel)] = &[
    ("ONCE", OccurrenceLabel::Rare),
    ("RARELY", OccurrenceLabel::Rare),
    ("UNDETERMINED", OccurrenceLabel::Rare),
    ("INTERMITTENT", OccurrenceLabel::Rare),
    ("LOW OCCURRENCE", OccurrenceLabel::Rare),
    ("SOMETIMES", OccurrenceLabel::Rare),
    ("25%", OccurrenceLabel::Frequent),
    ("50%", OccurrenceLabel::Frequent),
    ("75%", OccurrenceLabel::Frequent),
    ("ALWAYS", OccurrenceLabel::Certain),
    ("FREQUENTLY", OccurrenceLabel::Frequent),
];

/// Priority words used by the AI rater
const AI_PRIORITIES: &[(&str, PriorityLabel)] = &[
    ("BLOCKER", PriorityLabel::Blocker),
    ("URGENT", PriorityLabel::Critical),
    ("HIGH", PriorityLabel::Major),
    ("MEDIUM", PriorityLabel::Major),
    ("LOW", PriorityLabel::Minor),
];

/// Priority words used by the human rater
const USER_PRIORITIES: &[(&str, PriorityLabel)] = &[
    ("BLOCKER", PriorityLabel::Blocker),
    ("CRITICAL", PriorityLabel::Critical),
    ("MAJOR", PriorityLabel::Major),
    ("MINOR", PriorityLabel::Minor),
];

/// Normalize one raw rating. `None`, empty and whitespace-only values are
/// null ratings and stay `None`.
pub fn normalize(attribute: Attribute, raw: Option<&str>) -> Option<Normalized> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }
    let value = value.to_uppercase();
    Some(match attribute {
        Attribute::Severity => normalize_severity(value),
        Attribute::Occurrence => normalize_occurrence(value),
        Attribute::Priority => normalize_priority(value),
    })
}

fn normalize_severity(value: String) -> Normalized {
    let found = [SEVERITY_CODES, SEVERITY_NAMES, SEVERITY_GRADES]
        .iter()
        .find_map(|table| find_substring(table, &value));
    match found {
        Some(label) => Normalized::Canonical(CanonicalLabel::Severity(label)),
        None => Normalized::Unrecognized(value),
    }
}

fn normalize_occurrence(value: String) -> Normalized {
    let found = find_exact(OCCURRENCE_TOKENS, &value)
        .or_else(|| find_exact(OCCURRENCE_SYNONYMS, &value))
        .or_else(|| occurrence_from_percentage(&value));
    match found {
        Some(label) => Normalized::Canonical(CanonicalLabel::Occurrence(label)),
        None => Normalized::Unrecognized(value),
    }
}

/// Bucket a percentage that the synonym table did not catch.
///
/// The thresholds disagree with the table (which maps 50% and 75% to
/// FREQUENT); both are kept as they are.
fn occurrence_from_percentage(value: &str) -> Option<OccurrenceLabel> {
    if !value.contains('%') {
        return None;
    }
    let percentage: f64 = value.replace('%', "").trim().parse().ok()?;
    Some(if percentage <= 25.0 {
        OccurrenceLabel::Frequent
    } else if percentage <= 75.0 {
        OccurrenceLabel::VeryFrequent
    } else {
        OccurrenceLabel::Certain
    })
}

fn normalize_priority(value: String) -> Normalized {
    let found = find_exact(AI_PRIORITIES, &value).or_else(|| find_exact(USER_PRIORITIES, &value));
    match found {
        Some(label) => Normalized::Canonical(CanonicalLabel::Priority(label)),
        None => Normalized::Unrecognized(value),
    }
}

fn find_substring<T: Copy>(table: &[(&str, T)], value: &str) -> Option<T> {
    table
        .iter()
        .find(|(pattern, _)| value.contains(pattern))
        .map(|(_, label)| *label)
}

fn find_exact<T: Copy>(table: &[(&str, T)], value: &str) -> Option<T> {
    table
        .iter()
        .find(|(pattern, _)| *pattern == value)
        .map(|(_, label)| *label)
}
