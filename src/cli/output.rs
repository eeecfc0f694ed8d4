//! Output file naming
//!
//! Auto-generated names embed the input base name and a `YYYYMMDD_HHMMSS`
//! timestamp so repeated runs never overwrite each other.

use chrono::Local;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `<dir>/<input stem>_match_rates_<timestamp>.csv`
pub fn auto_results_path(input: &Path, dir: &Path, timestamp: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    dir.join(format!("{stem}_match_rates_{timestamp}.csv"))
}

/// `<dir>/match_rates_comparison_<timestamp>.svg`
pub fn auto_chart_path(dir: &Path, timestamp: &str) -> PathBuf {
    dir.join(format!("match_rates_comparison_{timestamp}.svg"))
}

/// The files written by one match-rate run, derived from the results path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPaths {
    pub results_csv: PathBuf,
    pub results_txt: PathBuf,
    pub detailed_csv: PathBuf,
    pub detailed_txt: PathBuf,
}

impl ResultPaths {
    pub fn new(results_csv: &Path) -> Self {
        Self {
            results_csv: results_csv.to_path_buf(),
            results_txt: results_csv.with_extension("txt"),
            detailed_csv: sibling_with_suffix(results_csv, "_detailed", "csv"),
            detailed_txt: sibling_with_suffix(results_csv, "_detailed", "txt"),
        }
    }
}

/// `dir/stem.ext` -> `dir/stem<suffix>.<extension>`
pub fn sibling_with_suffix(path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_auto_results_path() {
        let path = auto_results_path(
            Path::new("data/issues_q3.csv"),
            Path::new("out"),
            "20240102_030405",
        );
        assert_eq!(path, PathBuf::from("out/issues_q3_match_rates_20240102_030405.csv"));
    }

    #[test]
    fn test_result_paths() {
        let paths = ResultPaths::new(Path::new("out/run.csv"));
        assert_eq!(paths.results_txt, PathBuf::from("out/run.txt"));
        assert_eq!(paths.detailed_csv, PathBuf::from("out/run_detailed.csv"));
        assert_eq!(paths.detailed_txt, PathBuf::from("out/run_detailed.txt"));
    }

    #[test]
    fn test_auto_chart_path() {
        assert_eq!(
            auto_chart_path(Path::new("."), "20240102_030405"),
            PathBuf::from("./match_rates_comparison_20240102_030405.svg")
        );
    }
}
