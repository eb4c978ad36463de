//! Integration tests for torgate
//!
//! Only the unprivileged commands are exercised; mutating commands would
//! re-invoke through sudo.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a test torgate command
fn torgate() -> Command {
    Command::cargo_bin("torgate").unwrap()
}

#[test]
fn test_help_command() {
    torgate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transparent Tor Gateway"))
        .stdout(predicate::str::contains("--install"))
        .stdout(predicate::str::contains("--query"));
}

#[test]
fn test_version() {
    torgate()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_arguments_shows_usage() {
    torgate()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_query_single_match() {
    torgate()
        .args(["-q", "bul"])
        .assert()
        .success()
        .stdout("[BG] Bulgaria\n");
}

#[test]
fn test_query_is_case_insensitive() {
    torgate()
        .args(["--query", "GERMANY"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DE] Germany"));
}

#[test]
fn test_query_without_match_is_not_an_error() {
    torgate()
        .args(["--query", "atlantis"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No regions match"));
}

#[test]
fn test_query_missing_keyword_shows_usage() {
    torgate()
        .arg("--query")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_region_missing_value_shows_usage() {
    torgate()
        .arg("-r")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_option() {
    torgate()
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_actions_are_exclusive() {
    torgate()
        .args(["--test", "--restart"])
        .assert()
        .failure();
}

#[test]
fn test_connectivity_reports_outcome() {
    // Depends on curl, torsocks and a running Tor; either outcome is acceptable
    let output = torgate().arg("--test").output().unwrap();

    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Tor"), "unexpected output: {}", stdout);
    } else {
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Error:"), "unexpected stderr: {}", stderr);
        assert!(stderr.contains("Hint:"), "missing hint: {}", stderr);
    }
}

#[test]
fn test_malformed_dispatch_is_rejected() {
    torgate()
        .args(["@dispatch", "7"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
