//! CLI contract tests
//!
//! Runs both binaries against CSV/TXT inputs in temp directories and checks
//! console output and the files written.

use std::path::Path;
use std::io::Write;
use std::process::{Command, Stdio};

const HEADER: &str =
    "id,user_severity,ai_severity,user_occurrence,ai_occurrence,user_priority,ai_priority";

fn matchrate_bin() -> &'static str {
    env!("CARGO_BIN_EXE_matchrate")
}

fn compare_bin() -> &'static str {
    env!("CARGO_BIN_EXE_matchrate-compare")
}

fn write_csv(dir: &Path, name: &str, rows: &[&str]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Run a binary in `dir` and return (exit code, stdout, stderr)
fn run(bin: &str, dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("MATCHRATE_CONFIG")
        .output()
        .expect("Failed to run binary");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// Like `run`, feeding `input` on stdin
fn run_with_stdin(bin: &str, dir: &Path, args: &[&str], input: &str) -> (i32, String, String) {
    let mut child = Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("MATCHRATE_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run binary");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait on binary");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

// ============================================================================
// matchrate
// ============================================================================

#[test]
fn test_single_row_all_match() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "issues.csv",
        &["1,CRITICAL (A),A - SHOWSTOPPER,ALWAYS,CERTAIN,URGENT,CRITICAL"],
    );

    let (code, stdout, _) = run(matchrate_bin(), dir.path(), &["issues.csv"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Successfully loaded 1 issues from"));
    assert!(stdout.contains("=== MATCH RATE RESULTS ==="));
    assert!(stdout.contains("Severity Match Rate (%): 100.00"));
    assert!(stdout.contains("Occurrence Match Rate (%): 100.00"));
    assert!(stdout.contains("Priority Match Rate (%): 100.00"));
    assert!(stdout.contains("Overall Match Rate (%): 100.00"));
    assert!(stdout.contains("Total Issues Analyzed: 1"));
    assert!(!stdout.contains("DETAILED BREAKDOWN"));
}

#[test]
fn test_missing_columns_fail_without_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("issues.csv"),
        "user_severity,ai_severity,user_occurrence,ai_occurrence,user_priority\nMAJOR (B),B - MAJOR,ONCE,RARE,LOW\n",
    )
    .unwrap();

    let (code, stdout, stderr) = run(
        matchrate_bin(),
        dir.path(),
        &["issues.csv", "--output-file", "results.csv"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("Missing columns in CSV: ai_priority"));
    assert!(stderr.contains("Unable to calculate match rates"));
    assert!(!stdout.contains("MATCH RATE RESULTS"));
    assert!(!dir.path().join("results.csv").exists());
    assert!(!dir.path().join("results.txt").exists());
}

#[test]
fn test_missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run(matchrate_bin(), dir.path(), &["nope.csv"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("nope.csv"));
}

#[test]
fn test_output_file_with_detailed_writes_four_files() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "issues.csv",
        &[
            "1,MAJOR (B),B - MAJOR,ONCE,RARE,HIGH,MAJOR",
            "2,MINOR (C),B - MAJOR,ALWAYS,CERTAIN,LOW,MINOR",
            "3,SAFETY,,60%,VERY FREQUENT,MEDIUM,MAJOR",
        ],
    );

    let (code, stdout, _) = run(
        matchrate_bin(),
        dir.path(),
        &["issues.csv", "--detailed", "--output-file", "run1.csv"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("=== DETAILED BREAKDOWN ==="));
    assert!(stdout.contains("SEVERITY MISMATCHES:"));
    assert!(stdout.contains("Valid Severity Comparisons: 2"));
    assert!(stdout.contains("Severity Match Rate (%): 50.00"));
    assert!(stdout.contains("Occurrence Match Rate (%): 100.00"));

    let results = std::fs::read_to_string(dir.path().join("run1.csv")).unwrap();
    assert!(results.starts_with("Severity Match Rate (%),"));
    assert_eq!(results.lines().count(), 2);

    let text = std::fs::read_to_string(dir.path().join("run1.txt")).unwrap();
    assert!(text.starts_with("=== MATCH RATE RESULTS ===\n\n"));
    assert!(text.contains("Total Issues Analyzed: 3"));

    let detailed = std::fs::read_to_string(dir.path().join("run1_detailed.csv")).unwrap();
    let lines: Vec<&str> = detailed.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("user_severity,ai_severity,"));
    assert!(lines[0].ends_with("severity_match,occurrence_match,priority_match,all_match"));
    assert!(lines[1].ends_with("true,true,true,true"));
    assert!(lines[3].contains("SAFETY-ONLY,,VERY FREQUENT,VERY FREQUENT"));

    let breakdown = std::fs::read_to_string(dir.path().join("run1_detailed.txt")).unwrap();
    assert!(breakdown.contains("OCCURRENCE MISMATCHES:"));
    assert!(breakdown.contains("PRIORITY MISMATCHES:"));
}

#[test]
fn test_auto_output_uses_configured_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(dir.path(), "issues.csv", &["1,MAJOR (B),B - MAJOR,ONCE,RARE,HIGH,MAJOR"]);
    std::fs::write(
        dir.path().join("matchrate.toml"),
        "[output]\ndirectory = \"reports\"\n",
    )
    .unwrap();

    let (code, _, _) = run(matchrate_bin(), dir.path(), &["issues.csv", "--output"]);
    assert_eq!(code, 0);

    let names: Vec<String> = std::fs::read_dir(dir.path().join("reports"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 2);
    let csv = names.iter().find(|n| n.ends_with(".csv")).unwrap();
    assert!(csv.starts_with("issues_match_rates_"));
    // issues_match_rates_YYYYMMDD_HHMMSS.csv
    assert_eq!(csv.len(), "issues_match_rates_".len() + 15 + ".csv".len());
    assert!(names.iter().any(|n| n.ends_with(".txt")));
}

#[test]
fn test_config_column_mapping() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("issues.csv"),
        "Human Sev,AI Sev,Human Occ,AI Occ,Human Pri,AI Pri\nMINOR (C),C - MINOR,RARELY,RARE,URGENT,CRITICAL\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("columns.toml"),
        r#"[columns]
user_severity = "Human Sev"
ai_severity = "AI Sev"
user_occurrence = "Human Occ"
ai_occurrence = "AI Occ"
user_priority = "Human Pri"
ai_priority = "AI Pri"
"#,
    )
    .unwrap();

    let (code, stdout, _) = run(
        matchrate_bin(),
        dir.path(),
        &["issues.csv", "--config", "columns.toml"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Overall Match Rate (%): 100.00"));
}

#[test]
fn test_json_format() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        dir.path(),
        "issues.csv",
        &[
            "1,MAJOR (B),B - MAJOR,ONCE,RARE,HIGH,MAJOR",
            "2,MAJOR (B),C - MINOR,ONCE,RARE,HIGH,MAJOR",
        ],
    );

    let (code, stdout, _) = run(
        matchrate_bin(),
        dir.path(),
        &["issues.csv", "--format", "json", "--detailed"],
    );
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(parsed["result"]["Severity Match Rate (%)"], 50.0);
    assert_eq!(parsed["result"]["Valid Priority Comparisons"], 2);
    assert_eq!(parsed["breakdown"].as_array().unwrap().len(), 3);
}

// ============================================================================
// matchrate-compare
// ============================================================================

#[test]
fn test_compare_files_writes_chart_and_table() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("run1.txt"),
        "=== MATCH RATE RESULTS ===\n\nSeverity Match Rate (%): 80.00\nOccurrence Match Rate (%): 50.00\nPriority Match Rate (%): 70.00\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("run2.csv"),
        "Severity Match Rate (%),Occurrence Match Rate (%),Priority Match Rate (%),Overall Match Rate (%)\n90.0,70.0,50.0,30.0\n",
    )
    .unwrap();

    let (code, stdout, _) = run(
        compare_bin(),
        dir.path(),
        &[
            "--files",
            "run1.txt",
            "run2.csv",
            "--labels",
            "Baseline",
            "Tuned",
            "--output",
            "chart.svg",
        ],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("=== DETAILED COMPARISON ==="));
    assert!(stdout.contains("AVERAGE"));
    assert!(stdout.contains("- Average Severity Match Rate: 85.00%"));
    assert!(stdout.contains("- Overall Average Match Rate: 68.33%"));

    let svg = std::fs::read_to_string(dir.path().join("chart.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Baseline"));
    assert!(svg.contains("Severity Avg: 85.0%"));

    let table = std::fs::read_to_string(dir.path().join("chart.csv")).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "Measurement,Severity,Occurrence,Priority");
    assert_eq!(lines[1], "Baseline,80.00,50.00,70.00");
    assert_eq!(lines[2], "Tuned,90.00,70.00,50.00");
    assert_eq!(lines[3], "AVERAGE,85.00,60.00,60.00");
}

#[test]
fn test_compare_drops_unconvertible_measurement() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("good.txt"),
        "Severity Match Rate (%): 40\nOccurrence Match Rate (%): 40\nPriority Match Rate (%): 40\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("bad.txt"),
        "Severity Match Rate (%): forty\nOccurrence Match Rate (%): 40\nPriority Match Rate (%): 40\n",
    )
    .unwrap();

    let (code, stdout, stderr) = run(
        compare_bin(),
        dir.path(),
        &["--files", "good.txt", "bad.txt", "-o", "out.svg"],
    );
    assert_eq!(code, 0);
    assert!(stderr.contains("bad.txt"));
    assert!(stdout.contains("good.txt"));
    let table = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
    assert_eq!(table.lines().count(), 3);
}

#[test]
fn test_compare_manual_entry_from_piped_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_with_stdin(
        compare_bin(),
        dir.path(),
        &["--manual", "-o", "c.svg"],
        "1\nRunA\n80\n70\n60\n",
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("Manual Entry Mode"));
    assert!(dir.path().join("c.svg").exists());
    let table = std::fs::read_to_string(dir.path().join("c.csv")).unwrap();
    assert_eq!(table.lines().nth(1), Some("RunA,80.00,70.00,60.00"));
}

#[test]
fn test_compare_manual_labels_follow_file_labels() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("good.txt"),
        "Severity Match Rate (%): 40\nOccurrence Match Rate (%): 40\nPriority Match Rate (%): 40\n",
    )
    .unwrap();

    // bad.txt does not exist; good.txt keeps "B" and the entry takes "C"
    let (code, _, stderr) = run_with_stdin(
        compare_bin(),
        dir.path(),
        &[
            "--files", "bad.txt", "good.txt", "--labels", "A", "B", "C", "--manual", "-o",
            "c.svg",
        ],
        "1\n80\n70\n60\n",
    );
    assert_eq!(code, 0, "stderr: {stderr}");
    let table = std::fs::read_to_string(dir.path().join("c.csv")).unwrap();
    let labels: Vec<&str> = table
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(labels, ["B", "C", "AVERAGE"]);
}

#[test]
fn test_compare_manual_zero_measurements_is_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) =
        run_with_stdin(compare_bin(), dir.path(), &["--manual", "-o", "c.svg"], "0\n");
    assert_ne!(code, 0);
    assert!(stderr.contains("No data provided for visualization"));
    assert!(!dir.path().join("c.svg").exists());
}
