//! Integration tests for the `studysched` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to run every subcommand
//! against the busy-time fixture, including stdin input, file output, policy
//! files and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper: path to the busy.json fixture (merges to 09:00-11:00 and 14:00-15:00).
fn busy_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/busy.json")
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn studysched() -> Command {
    Command::cargo_bin("studysched").unwrap()
}

/// Helper: run with the busy fixture and parse stdout as JSON.
fn run_json(args: &[&str]) -> Value {
    let output = studysched()
        .args(["-i", busy_json_path()])
        .args(args)
        .output()
        .expect("studysched should run");
    assert!(
        output.status.success(),
        "studysched failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

fn starts(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|v| v["start"].as_str().unwrap())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// merge
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn merge_file_to_stdout() {
    let merged = run_json(&["merge"]);
    assert_eq!(
        merged,
        serde_json::json!([
            { "start": "2026-03-02T09:00:00Z", "end": "2026-03-02T11:00:00Z" },
            { "start": "2026-03-02T14:00:00Z", "end": "2026-03-02T15:00:00Z" }
        ])
    );
}

#[test]
fn merge_stdin_to_stdout() {
    let input = r#"[{"start":"2026-03-02T10:00:00Z","end":"2026-03-02T11:00:00Z"},
                    {"start":"2026-03-02T11:00:00Z","end":"2026-03-02T12:00:00Z"}]"#;

    studysched()
        .arg("merge")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-03-02T10:00:00Z"))
        .stdout(predicate::str::contains("2026-03-02T12:00:00Z"))
        .stdout(predicate::str::contains("2026-03-02T11:00:00Z").not());
}

#[test]
fn blank_stdin_is_an_empty_calendar() {
    studysched()
        .arg("merge")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn merge_drops_invalid_intervals() {
    let input = r#"[{"start":"2026-03-02T10:00:00Z","end":"2026-03-02T09:00:00Z"},
                    {"start":"2026-03-02T12:00:00Z","end":"2026-03-02T13:00:00Z"}]"#;

    let output = studysched().arg("merge").write_stdin(input).output().unwrap();
    assert!(output.status.success());
    let merged: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(merged.as_array().unwrap().len(), 1);
}

#[test]
fn merge_file_to_file() {
    let output_path = std::env::temp_dir().join("studysched-test-merge-output.json");
    let _ = std::fs::remove_file(&output_path);

    studysched()
        .args(["merge", "-i", busy_json_path(), "-o"])
        .arg(&output_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let merged: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(merged.as_array().unwrap().len(), 2);

    let _ = std::fs::remove_file(&output_path);
}

// ─────────────────────────────────────────────────────────────────────────────
// conflicts / gaps
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflicts_reports_overlap() {
    let result = run_json(&[
        "conflicts",
        "--start",
        "2026-03-02T10:30:00Z",
        "--end",
        "2026-03-02T11:30:00Z",
    ]);
    assert_eq!(result["has_conflict"], true);
    assert_eq!(result["conflicting_intervals"][0]["start"], "2026-03-02T09:00:00Z");
}

#[test]
fn conflicts_adjacent_is_clear() {
    let result = run_json(&[
        "conflicts",
        "--start",
        "2026-03-02T11:00:00Z",
        "--end",
        "2026-03-02T12:00:00Z",
    ]);
    assert_eq!(result["has_conflict"], false);
}

#[test]
fn gaps_inside_window() {
    let gaps = run_json(&[
        "gaps",
        "--from",
        "2026-03-02T08:00:00Z",
        "--to",
        "2026-03-02T17:00:00Z",
    ]);
    assert_eq!(
        starts(&gaps),
        vec![
            "2026-03-02T08:00:00Z",
            "2026-03-02T11:00:00Z",
            "2026-03-02T15:00:00Z"
        ]
    );
    assert_eq!(gaps[0]["start_edge"], "window");
    assert_eq!(gaps[1]["start_edge"], "busy");
}

// ─────────────────────────────────────────────────────────────────────────────
// slots / next
// ─────────────────────────────────────────────────────────────────────────────

const MORNING: [&str; 4] = ["--from", "2026-03-02T08:00:00Z", "--to", "2026-03-02T12:00:00Z"];

#[test]
fn slots_with_default_policy() {
    let mut args = vec!["slots"];
    args.extend(MORNING);
    args.extend(["--duration", "30", "--break", "10"]);

    let slots = run_json(&args);

    assert_eq!(
        starts(&slots),
        vec!["2026-03-02T08:00:00Z", "2026-03-02T11:10:00Z"]
    );
    assert_eq!(slots[0]["duration_minutes"], 30);
}

#[test]
fn slots_with_policy_file() {
    let config = fixture("pad_all_edges.toml");
    let mut args = vec!["slots", "--config", config.as_str()];
    args.extend(MORNING);
    args.extend(["--duration", "30", "--break", "10"]);

    let slots = run_json(&args);

    assert_eq!(
        starts(&slots),
        vec!["2026-03-02T08:10:00Z", "2026-03-02T11:10:00Z"]
    );
}

#[test]
fn next_skips_busy_and_break() {
    let slot = run_json(&[
        "next",
        "--from",
        "2026-03-02T09:00:00Z",
        "--to",
        "2026-03-02T17:00:00Z",
        "--duration",
        "60",
        "--break",
        "15",
    ]);
    assert_eq!(slot["start"], "2026-03-02T11:15:00Z");
    assert_eq!(slot["end"], "2026-03-02T12:15:00Z");
}

#[test]
fn next_prints_null_when_nothing_fits() {
    let slot = run_json(&[
        "next",
        "--from",
        "2026-03-02T09:00:00Z",
        "--to",
        "2026-03-02T11:00:00Z",
        "--duration",
        "30",
    ]);
    assert!(slot.is_null());
}

// ─────────────────────────────────────────────────────────────────────────────
// alternatives / plan
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn alternatives_with_explicit_limits() {
    let alternatives = run_json(&[
        "alternatives",
        "--start",
        "2026-03-02T10:00:00Z",
        "--end",
        "2026-03-02T10:30:00Z",
        "--max",
        "2",
        "--horizon",
        "120",
    ]);
    assert_eq!(
        starts(&alternatives),
        vec!["2026-03-02T11:00:00Z", "2026-03-02T11:15:00Z"]
    );
}

#[test]
fn alternatives_limits_from_policy_file() {
    let config = fixture("pad_all_edges.toml");
    let alternatives = run_json(&[
        "alternatives",
        "--config",
        config.as_str(),
        "--start",
        "2026-03-02T10:00:00Z",
        "--end",
        "2026-03-02T10:30:00Z",
    ]);
    assert_eq!(alternatives.as_array().unwrap().len(), 2);
}

#[test]
fn plan_conflict_includes_alternatives() {
    let plan = run_json(&[
        "plan",
        "--start",
        "2026-03-02T10:00:00Z",
        "--end",
        "2026-03-02T10:30:00Z",
    ]);
    assert_eq!(plan["status"], "conflict");
    assert_eq!(plan["conflicts"]["has_conflict"], true);
    assert_eq!(plan["alternatives"].as_array().unwrap().len(), 3);
}

#[test]
fn plan_clear_request_is_available() {
    let plan = run_json(&[
        "plan",
        "--start",
        "2026-03-02T12:00:00Z",
        "--end",
        "2026-03-02T13:00:00Z",
    ]);
    assert_eq!(plan["status"], "available");
    assert_eq!(plan["slot"]["duration_minutes"], 60);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn invalid_busy_json_fails() {
    studysched()
        .arg("merge")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse busy intervals JSON"));
}

#[test]
fn zero_duration_query_fails() {
    let mut args = vec!["slots", "-i", busy_json_path()];
    args.extend(MORNING);
    args.extend(["--duration", "0"]);

    studysched()
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid query"));
}

#[test]
fn reversed_candidate_fails() {
    studysched()
        .args([
            "conflicts",
            "-i",
            busy_json_path(),
            "--start",
            "2026-03-02T11:00:00Z",
            "--end",
            "2026-03-02T10:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid interval"));
}

#[test]
fn unparseable_datetime_rejected_by_clap() {
    studysched()
        .args(["conflicts", "-i", busy_json_path(), "--start", "tomorrow", "--end", "later"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--start"));
}

#[test]
fn invalid_policy_file_fails() {
    let config = fixture("invalid_policy.toml");
    studysched()
        .args(["merge", "-i", busy_json_path(), "--config", config.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn missing_input_file_fails() {
    studysched()
        .args(["merge", "-i", "/nonexistent/busy.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}
