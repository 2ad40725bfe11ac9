//! Integration tests for the nmctl binary
//!
//! Restricted to paths that work without a real nmcli on the system:
//! help output and the formatted-only interactive commands.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a test nmctl command
fn nmctl() -> Command {
    Command::cargo_bin("nmctl").unwrap()
}

#[test]
fn test_help_command() {
    nmctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Typed nmcli wrapper"));
}

#[test]
fn test_version() {
    nmctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_connection_edit_prints_command() {
    nmctl()
        .args(["connection", "edit", "Home"])
        .assert()
        .success()
        .stdout("sudo nmcli con edit Home\n");
}

#[test]
fn test_connection_edit_without_sudo() {
    nmctl()
        .args(["--no-sudo", "connection", "edit", "My Home's Network"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("nmcli con edit "));
}

#[test]
fn test_connection_monitor_prints_command() {
    nmctl()
        .args(["--no-sudo", "connection", "monitor"])
        .assert()
        .success()
        .stdout("nmcli con monitor\n");
}

#[test]
fn test_unknown_subcommand_fails() {
    nmctl().arg("frobnicate").assert().failure();
}
