//! Plain text reporter
//!
//! The same text goes to the terminal and to the `.txt` companion files, so
//! it carries no color codes.

use super::MatchReport;
use crate::aggregate::CrossTab;
use crate::models::MatchResult;
use anyhow::Result;

pub const RESULTS_HEADING: &str = "=== MATCH RATE RESULTS ===";
pub const BREAKDOWN_HEADING: &str = "=== DETAILED BREAKDOWN ===";

/// Render the full report: results, then the breakdown if present
pub fn render(report: &MatchReport) -> Result<String> {
    let mut out = render_results(&report.result);
    if let Some(breakdown) = &report.breakdown {
        out.push('\n');
        out.push_str(&render_breakdown(breakdown));
    }
    Ok(out)
}

/// `=== MATCH RATE RESULTS ===` followed by one `Name: value` line per field
pub fn render_results(result: &MatchResult) -> String {
    let mut out = format!("{RESULTS_HEADING}\n\n");
    for (name, value) in result.fields() {
        out.push_str(&format!("{name}: {value}\n"));
    }
    out
}

/// The cross-tabs, one block per attribute
pub fn render_breakdown(crosstabs: &[CrossTab]) -> String {
    let mut out = format!("{BREAKDOWN_HEADING}\n\n");
    let blocks: Vec<String> = crosstabs
        .iter()
        .map(|tab| {
            format!(
                "{} MISMATCHES:\n{}",
                tab.attribute.key().to_uppercase(),
                tab.render()
            )
        })
        .collect();
    out.push_str(&blocks.join("\n"));
    out
}
