//! Manual measurement entry
//!
//! Prompts on the terminal for one or more measurements when no usable
//! results files were given (or `--manual` was passed). When stdin is piped
//! the same answers are read line by line without prompting.
//!
//! Answers, in order: the number of measurements, then per measurement a
//! label (skipped when `--labels` already names it) and the severity,
//! occurrence and priority rates.

use super::default_label;
use crate::models::{Attribute, Measurement};
use anyhow::{Context, Result};
use console::{style, Term};
use dialoguer::Input;
use std::io::{BufRead, IsTerminal};
use tracing::debug;

/// Label for an entered measurement; blank input falls back to
/// "Measurement N"
pub fn resolve_label(input: &str, index: usize) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        default_label(index)
    } else {
        trimmed.to_string()
    }
}

/// Source of manual answers
trait Answers {
    fn count(&mut self) -> Result<usize>;
    fn label(&mut self, index: usize) -> Result<String>;
    fn rate(&mut self, index: usize, attribute: Attribute) -> Result<f64>;
}

/// Enter measurements. `first_index` is the position of the first entered
/// measurement among all measurements; `labels` holds labels given on the
/// command line, indexed by that position.
pub fn prompt_measurements(first_index: usize, labels: &[String]) -> Result<Vec<Measurement>> {
    println!("\n{}", style("Manual Entry Mode").bold());
    println!("=================");

    // dialoguer draws on stderr and reads keys from the terminal
    if Term::stderr().is_term() && std::io::stdin().is_terminal() {
        collect(&mut Prompter, first_index, labels)
    } else {
        debug!("stdin is not a terminal, reading manual entry line by line");
        read_measurements(std::io::stdin().lock(), first_index, labels)
    }
}

/// Read measurements from line-oriented input, one answer per line
pub fn read_measurements<R: BufRead>(
    reader: R,
    first_index: usize,
    labels: &[String],
) -> Result<Vec<Measurement>> {
    let mut lines = LineAnswers {
        lines: reader.lines(),
    };
    collect(&mut lines, first_index, labels)
}

fn collect(
    answers: &mut dyn Answers,
    first_index: usize,
    labels: &[String],
) -> Result<Vec<Measurement>> {
    let count = answers.count()?;
    let mut measurements = Vec::with_capacity(count);
    for offset in 0..count {
        let index = first_index + offset;
        let label = match labels.get(index) {
            Some(label) => label.clone(),
            None => answers.label(index)?,
        };

        let mut rates = [0.0; 3];
        for (rate, attribute) in rates.iter_mut().zip(Attribute::all()) {
            *rate = answers.rate(index, *attribute)?;
        }

        measurements.push(Measurement {
            label,
            severity: rates[0],
            occurrence: rates[1],
            priority: rates[2],
        });
    }
    Ok(measurements)
}

struct Prompter;

impl Answers for Prompter {
    fn count(&mut self) -> Result<usize> {
        Ok(Input::new()
            .with_prompt("Enter number of measurements")
            .interact_text()?)
    }

    fn label(&mut self, index: usize) -> Result<String> {
        println!("\n{}:", style(default_label(index)).cyan());
        let input: String = Input::new()
            .with_prompt(format!("Label for {}", default_label(index)))
            .allow_empty(true)
            .interact_text()?;
        Ok(resolve_label(&input, index))
    }

    fn rate(&mut self, _index: usize, attribute: Attribute) -> Result<f64> {
        Ok(Input::<f64>::new()
            .with_prompt(format!("{} Match Rate (%)", attribute.title()))
            .interact_text()?)
    }
}

struct LineAnswers<L> {
    lines: L,
}

impl<L: Iterator<Item = std::io::Result<String>>> LineAnswers<L> {
    fn next_line(&mut self, what: &str) -> Result<String> {
        match self.lines.next() {
            Some(line) => Ok(line.context("failed to read manual entry")?),
            None => anyhow::bail!("Manual entry ended before {}", what),
        }
    }
}

impl<L: Iterator<Item = std::io::Result<String>>> Answers for LineAnswers<L> {
    fn count(&mut self) -> Result<usize> {
        let line = self.next_line("the number of measurements")?;
        line.trim()
            .parse()
            .with_context(|| format!("Invalid number of measurements '{}'", line.trim()))
    }

    fn label(&mut self, index: usize) -> Result<String> {
        let line = self.next_line(&format!("the label of {}", default_label(index)))?;
        Ok(resolve_label(&line, index))
    }

    fn rate(&mut self, index: usize, attribute: Attribute) -> Result<f64> {
        let line = self.next_line(&format!(
            "the {} rate of {}",
            attribute.key(),
            default_label(index)
        ))?;
        line.trim().parse().with_context(|| {
            format!(
                "Invalid {} match rate '{}' for {}",
                attribute.key(),
                line.trim(),
                default_label(index)
            )
        })
    }
}
