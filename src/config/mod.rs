//! Project-level configuration support
//!
//! Loads optional settings from `matchrate.toml` in the working directory, or
//! from an explicit `--config` path.
//!
//! # Configuration Format
//!
//! ```toml
//! # matchrate.toml
//!
//! [columns]
//! user_severity = "Human Severity"
//! ai_severity = "AI Severity"
//!
//! [output]
//! directory = "reports"
//!
//! [chart]
//! width = 1200
//! height = 800
//! title = "Comparison of Match Rates Across Measurements"
//! ```

use crate::models::{Attribute, Rater};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "matchrate.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MatchRateConfig {
    #[serde(default)]
    pub columns: ColumnNames,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Input column holding each of the six ratings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColumnNames {
    pub user_severity: String,
    pub ai_severity: String,
    pub user_occurrence: String,
    pub ai_occurrence: String,
    pub user_priority: String,
    pub ai_priority: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            user_severity: "user_severity".into(),
            ai_severity: "ai_severity".into(),
            user_occurrence: "user_occurrence".into(),
            ai_occurrence: "ai_occurrence".into(),
            user_priority: "user_priority".into(),
            ai_priority: "ai_priority".into(),
        }
    }
}

impl ColumnNames {
    pub fn get(&self, attribute: Attribute, rater: Rater) -> &str {
        match (attribute, rater) {
            (Attribute::Severity, Rater::User) => &self.user_severity,
            (Attribute::Severity, Rater::Ai) => &self.ai_severity,
            (Attribute::Occurrence, Rater::User) => &self.user_occurrence,
            (Attribute::Occurrence, Rater::Ai) => &self.ai_occurrence,
            (Attribute::Priority, Rater::User) => &self.user_priority,
            (Attribute::Priority, Rater::Ai) => &self.ai_priority,
        }
    }

    /// All six names in required-column order
    pub fn required(&self) -> Vec<&str> {
        Attribute::all()
            .iter()
            .flat_map(|a| [self.get(*a, Rater::User), self.get(*a, Rater::Ai)])
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for auto-named output files
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            title: "Comparison of Match Rates Across Measurements".into(),
        }
    }
}

/// Load configuration.
///
/// An explicit path must load. The implicit `matchrate.toml` in `dir` is
/// optional; if it is malformed a warning is logged and defaults are used.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<MatchRateConfig> {
    if let Some(path) = explicit {
        let config = load_toml_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let toml_path = dir.join(CONFIG_FILE_NAME);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded config from {}", toml_path.display());
                return Ok(config);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    debug!("No config found, using defaults");
    Ok(MatchRateConfig::default())
}

fn load_toml_config(path: &Path) -> Result<MatchRateConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: MatchRateConfig = toml::from_str(&content)?;
    Ok(config)
}
