//! Contingency table of user vs AI canonical labels

use crate::models::{Attribute, Rater};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Label of the margin row and column
pub const MARGIN_LABEL: &str = "All";

/// Counts of (user label, AI label) pairs for one attribute.
///
/// Labels are kept in lexical order. Only rows where both sides have a
/// canonical value are counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    pub attribute: Attribute,
    rows: Vec<String>,
    columns: Vec<String>,
    /// user label -> AI label -> count
    counts: BTreeMap<String, BTreeMap<String, usize>>,
}

impl CrossTab {
    pub fn from_pairs<'a>(
        attribute: Attribute,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        let mut columns = BTreeSet::new();
        for (user, ai) in pairs {
            *counts
                .entry(user.to_string())
                .or_default()
                .entry(ai.to_string())
                .or_default() += 1;
            columns.insert(ai.to_string());
        }
        Self {
            attribute,
            rows: counts.keys().cloned().collect(),
            columns: columns.into_iter().collect(),
            counts,
        }
    }

    /// User-side labels
    pub fn row_labels(&self) -> &[String] {
        &self.rows
    }

    /// AI-side labels
    pub fn column_labels(&self) -> &[String] {
        &self.columns
    }

    pub fn count(&self, user: &str, ai: &str) -> usize {
        self.counts
            .get(user)
            .and_then(|row| row.get(ai))
            .copied()
            .unwrap_or(0)
    }

    pub fn row_total(&self, user: &str) -> usize {
        self.counts.get(user).map(|row| row.values().sum()).unwrap_or(0)
    }

    pub fn column_total(&self, ai: &str) -> usize {
        self.counts.values().filter_map(|row| row.get(ai)).sum()
    }

    pub fn total(&self) -> usize {
        self.counts.values().flat_map(|row| row.values()).sum()
    }

    /// Render as a text grid with `All` margins.
    ///
    /// ```text
    /// ai_priority_std  CRITICAL  MINOR  All
    /// user_priority_std
    /// CRITICAL                1      0    1
    /// MINOR                   1      2    3
    /// All                     2      2    4
    /// ```
    pub fn render(&self) -> String {
        let column_axis = format!("{}_{}_std", Rater::Ai.key(), self.attribute.key());
        let row_axis = format!("{}_{}_std", Rater::User.key(), self.attribute.key());

        let mut header: Vec<String> = self.columns.clone();
        header.push(MARGIN_LABEL.to_string());

        let mut body: Vec<(String, Vec<usize>)> = self
            .rows
            .iter()
            .map(|user| {
                let mut cells: Vec<usize> =
                    self.columns.iter().map(|ai| self.count(user, ai)).collect();
                cells.push(self.row_total(user));
                (user.clone(), cells)
            })
            .collect();
        let mut margin: Vec<usize> = self.columns.iter().map(|ai| self.column_total(ai)).collect();
        margin.push(self.total());
        body.push((MARGIN_LABEL.to_string(), margin));

        let label_width = body
            .iter()
            .map(|(label, _)| label.chars().count())
            .chain([column_axis.chars().count()])
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                body.iter()
                    .map(|(_, cells)| cells[i].to_string().len())
                    .chain([name.chars().count()])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&format!("{:<label_width$}", column_axis));
        for (name, width) in header.iter().zip(&widths) {
            out.push_str(&format!("  {:>width$}", name));
        }
        out.push('\n');
        out.push_str(&row_axis);
        out.push('\n');
        for (label, cells) in &body {
            out.push_str(&format!("{:<label_width$}", label));
            for (cell, width) in cells.iter().zip(&widths) {
                out.push_str(&format!("  {:>width$}", cell));
            }
            out.push('\n');
        }
        out
    }
}
