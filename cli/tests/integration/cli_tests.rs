//! Integration tests for argument parsing, help, and privilege checks.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn svcinstall() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("svcinstall"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("SVCINSTALL_YES");
    cmd
}

fn running_as_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    svcinstall()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_help_lists_commands() {
    svcinstall()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("fix"))
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    svcinstall()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("svcinstall"));
}

#[test]
fn test_install_help_mentions_username() {
    svcinstall()
        .args(["install", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("USERNAME"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    svcinstall().arg("deploy").assert().code(2);
}

// --- Privilege checks ---

#[test]
fn test_install_without_root_exits_one() {
    if running_as_root() {
        return;
    }
    svcinstall()
        .arg("install")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must be run as root"))
        .stderr(predicate::str::contains("sudo svcinstall install"));
}

#[test]
fn test_fix_without_root_exits_one() {
    if running_as_root() {
        return;
    }
    svcinstall()
        .arg("fix")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sudo svcinstall fix"));
}

#[test]
fn test_uninstall_without_root_exits_one() {
    if running_as_root() {
        return;
    }
    svcinstall().arg("uninstall").assert().code(1);
}

// --- Configuration ---

#[test]
fn test_invalid_config_exits_one() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("config.yaml");
    std::fs::write(&path, "service:\n  name: \"bad name\"\n").expect("write config");

    svcinstall()
        .arg("--config")
        .arg(&path)
        .arg("render")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_unparseable_config_exits_one() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("config.yaml");
    std::fs::write(&path, "service: [unterminated\n").expect("write config");

    svcinstall()
        .env("SVCINSTALL_CONFIG", &path)
        .arg("render")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}
