//! Integration tests for the CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn health_score() -> Command {
    Command::cargo_bin("health-score").unwrap()
}

#[test]
fn test_cli_scan_help() {
    let mut cmd = health_score();
    cmd.arg("scan").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Score a snapshot"));
}

#[test]
fn test_cli_report_help() {
    let mut cmd = health_score();
    cmd.arg("report").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Generate a detailed health report"));
}

#[test]
fn test_cli_check_help() {
    let mut cmd = health_score();
    cmd.arg("check").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Check a snapshot against score thresholds"));
}

#[test]
fn test_cli_scan_healthy_snapshot() {
    let mut cmd = health_score();
    cmd.arg("scan").arg("--input").arg(fixture("healthy.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Business Health Summary"))
        .stdout(predicate::str::contains("Excellent"));
}

#[test]
fn test_cli_scan_detailed_lists_components() {
    let mut cmd = health_score();
    cmd.arg("scan")
        .arg("--input")
        .arg(fixture("struggling.json"))
        .arg("--detailed");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Detailed Results"))
        .stdout(predicate::str::contains("Collection Speed"))
        .stdout(predicate::str::contains("Recommendations"));
}

#[test]
fn test_cli_scan_with_fail_threshold_high() {
    let mut cmd = health_score();
    cmd.arg("scan")
        .arg("--input")
        .arg(fixture("struggling.json"))
        .arg("--fail-threshold")
        .arg("100"); // Unreachable threshold

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("below threshold"));
}

#[test]
fn test_cli_report_json() {
    let mut cmd = health_score();
    cmd.arg("report")
        .arg("--input")
        .arg(fixture("baseline.json"))
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"totalRounded\""))
        .stdout(predicate::str::contains("\"independenceVerified\": true"));
}

#[test]
fn test_cli_report_markdown_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("report.md");

    let mut cmd = health_score();
    cmd.arg("report")
        .arg("--input")
        .arg(fixture("baseline.json"))
        .arg("--output")
        .arg(&output);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("# Business Health Report"));
    assert!(content.contains("## Cash Flow Health"));
    assert!(content.contains("| Metric | Value | Points | Scale |"));
}

#[test]
fn test_cli_check_threshold() {
    let mut cmd = health_score();
    cmd.arg("check")
        .arg("--input")
        .arg(fixture("healthy.json"))
        .arg("--min-total")
        .arg("50")
        .arg("--min-category")
        .arg("20");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn test_cli_check_struggling_fails() {
    let mut cmd = health_score();
    cmd.arg("check")
        .arg("--input")
        .arg(fixture("struggling.json"))
        .arg("--min-category")
        .arg("10");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("check failures"))
        .stderr(predicate::str::contains("Cash Flow score"));
}

#[test]
fn test_cli_missing_input_fails() {
    let mut cmd = health_score();
    cmd.arg("scan").arg("--input").arg(fixture("missing.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read snapshot"));
}

#[test]
fn test_cli_explain_component() {
    let mut cmd = health_score();
    cmd.arg("explain").arg("collection-speed");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("collection_speed"))
        .stdout(predicate::str::contains("≤7 days → 12"));
}

#[test]
fn test_cli_explain_unknown_component() {
    let mut cmd = health_score();
    cmd.arg("explain").arg("vibes");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown component"));
}

#[test]
fn test_cli_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("health.toml");
    std::fs::write(&config, "category_ceiling = 0.0\n").unwrap();

    let mut cmd = health_score();
    cmd.arg("--config")
        .arg(&config)
        .arg("scan")
        .arg("--input")
        .arg(fixture("healthy.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_cli_config_caps_recommendations() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("health.toml");
    std::fs::write(&config, "[recommendations]\nmax_per_category = 1\n").unwrap();

    let mut cmd = health_score();
    cmd.arg("report")
        .arg("--input")
        .arg(fixture("struggling.json"))
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(&config);

    let output = cmd.assert().success().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    for category in ["profit", "cashflow", "efficiency", "risk"] {
        let recs = report["recommendations"][category].as_array().unwrap();
        assert!(recs.len() <= 1, "{} has {} recommendations", category, recs.len());
    }
}

#[test]
fn test_cli_batch_table() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["healthy.json", "struggling.json"] {
        std::fs::copy(fixture(name), dir.path().join(name)).unwrap();
    }

    let mut cmd = health_score();
    cmd.arg("batch").arg("--dir").arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("healthy"))
        .stdout(predicate::str::contains("struggling"));
}

#[test]
fn test_cli_batch_reports_bad_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(fixture("healthy.json"), dir.path().join("healthy.json")).unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

    let mut cmd = health_score();
    cmd.arg("batch")
        .arg("--dir")
        .arg(dir.path())
        .arg("--format")
        .arg("json");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"label\": \"broken\""))
        .stdout(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("could not be scored"));
}
