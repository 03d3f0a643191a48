//! Integration tests for the bookshelf binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--api-url"))
        .stdout(predicate::str::contains("--token-file"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bookshelf"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.arg("--no-such-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
