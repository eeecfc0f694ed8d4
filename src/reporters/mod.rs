//! Output reporters for match-rate results
//!
//! Supports two output formats:
//! - `text` - The plain report also written to the `.txt` companion files
//! - `json` - Machine-readable JSON

mod json;
pub mod text;

use crate::aggregate::{Agreement, CrossTab};
use crate::models::MatchResult;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// What a reporter renders: the summary figures and, when a detailed
/// breakdown was requested, the three cross-tabs
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub result: MatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<CrossTab>>,
}

impl MatchReport {
    pub fn new(agreement: &Agreement, detailed: bool) -> Self {
        Self {
            result: agreement.result().clone(),
            breakdown: detailed.then(|| agreement.crosstabs()),
        }
    }
}

/// Render a report using an OutputFormat enum
pub fn report_with_format(report: &MatchReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
    }
}
