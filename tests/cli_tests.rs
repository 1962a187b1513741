//! CLI surface tests
//!
//! Smoke tests for argument parsing and the commands that work without a
//! running daemon.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("snackd").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Snackbar indicator daemon"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("daemon"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("snackd").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("snackd"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("snackd").unwrap();
    cmd.arg("frobnicate").assert().failure();
}

#[test]
fn test_update_requires_an_option() {
    let mut cmd = Command::cargo_bin("snackd").unwrap();
    cmd.arg("update").assert().failure();
}

#[test]
fn test_generate_config_prints_valid_toml() {
    let mut cmd = Command::cargo_bin("snackd").unwrap();
    let output = cmd.arg("generate-config").assert().success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let parsed: toml::Value = toml::from_str(&stdout).unwrap();

    assert!(parsed.get("open_command").is_some());
    assert!(parsed.get("update_command").is_some());
    assert!(parsed.get("close_command").is_some());
    assert!(parsed.get("options").is_some());
    assert!(parsed.get("timeout_ms").is_some());
}

#[test]
fn test_ping_without_daemon_reports_not_running() {
    let dir = TempDir::new().unwrap();
    let socket = dir.path().join("daemon.sock");

    let mut cmd = Command::cargo_bin("snackd").unwrap();
    cmd.arg("--socket")
        .arg(&socket)
        .arg("ping")
        .assert()
        .failure()
        .stderr(predicate::str::contains("daemon not running"));
}

#[test]
fn test_daemon_refuses_to_start_with_missing_config() {
    let dir = TempDir::new().unwrap();
    let socket = dir.path().join("daemon.sock");
    let config = dir.path().join("missing.toml");

    let mut cmd = Command::cargo_bin("snackd").unwrap();
    cmd.arg("--socket")
        .arg(&socket)
        .arg("--config")
        .arg(&config)
        .arg("daemon")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));

    // Startup failed before the socket was ever bound.
    assert!(!socket.exists());
}

#[test]
fn test_daemon_refuses_to_start_with_invalid_config() {
    let dir = TempDir::new().unwrap();
    let socket = dir.path().join("daemon.sock");
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "timeout_ms = \"not a number\"").unwrap();

    let mut cmd = Command::cargo_bin("snackd").unwrap();
    cmd.arg("--socket")
        .arg(&socket)
        .arg("--config")
        .arg(&config)
        .arg("daemon")
        .assert()
        .failure();

    assert!(!socket.exists());
}
