//! Smoke tests for the axis6-e2e CLI
//!
//! None of these need a browser or a reachable site.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command for the binary, isolated from the caller's AXIS6 environment
fn axis6_e2e() -> Command {
    let mut cmd = Command::cargo_bin("axis6-e2e").expect("axis6-e2e binary should exist");
    cmd.env_remove("AXIS6_PRODUCTION_URL")
        .env_remove("BASE_URL")
        .env_remove("AXIS6_TEST_EMAIL")
        .env_remove("AXIS6_TEST_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    axis6_e2e()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    axis6_e2e()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn test_no_args_fails() {
    axis6_e2e().assert().failure();
}

#[test]
fn test_invalid_color_value() {
    axis6_e2e()
        .args(["--color", "sometimes", "list"])
        .assert()
        .failure();
}

// ============================================================================
// Subcommand Help Tests
// ============================================================================

#[test]
fn test_run_subcommand_help() {
    axis6_e2e()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--read-only"))
        .stdout(predicate::str::contains("--junit"))
        .stdout(predicate::str::contains("--fail-fast"));
}

#[test]
fn test_api_subcommand_help() {
    axis6_e2e()
        .args(["api", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--endpoint"));
}

// ============================================================================
// List
// ============================================================================

#[test]
fn test_list_scenarios() {
    axis6_e2e()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("landing_renders_hero"))
        .stdout(predicate::str::contains("register_new_user_reaches_app"))
        .stdout(predicate::str::contains("(mutates)"));
}

#[test]
fn test_list_filtered_by_tag() {
    let output = axis6_e2e()
        .args(["list", "--filter", "responsive"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 5);
}

#[test]
fn test_list_filter_without_match() {
    axis6_e2e()
        .args(["list", "--filter", "no-such-scenario"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenario matches"));
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_run_rejects_non_http_base_url() {
    axis6_e2e()
        .args(["--base-url", "ftp://axis6.app", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_run_without_matching_scenario() {
    axis6_e2e()
        .args(["run", "--filter", "no-such-scenario"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenario matches"));
}

#[test]
fn test_missing_config_file() {
    axis6_e2e()
        .args(["--config", "/nonexistent/axis6.yaml", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/axis6.yaml"));
}

// ============================================================================
// API liveness
// ============================================================================

#[test]
fn test_api_against_unreachable_site() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("axis6.yaml");
    fs::write(&config, "base_url: http://127.0.0.1:9\nrequest_timeout_ms: 2000\n").unwrap();

    axis6_e2e()
        .args(["--color", "never", "--config"])
        .arg(&config)
        .args(["api", "--endpoint", "/api/health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/api/health unreachable"))
        .stderr(predicate::str::contains("1 of 1 endpoints failing"));
}
