//! JSON reporter
//!
//! Outputs the match report as pretty-printed JSON, keyed by the same field
//! names as the results CSV.

use super::MatchReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &MatchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
