//! CLI argument parsing and validation tests — no network I/O.
//!
//! An unconfigured account (the default when no config file exists) is
//! rejected during strategy resolution, before any network call, so these
//! tests never need credentials.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("easel").unwrap();
    // Point at a nonexistent config so a developer's real one is ignored.
    cmd.env("EASEL_CONFIG", "/nonexistent/easel-test-config.toml");
    cmd.env_remove("EASEL_API_KEY");
    cmd
}

#[test]
fn invalid_kind_exits_with_error() {
    cmd()
        .args(["--kind", "vehicle", "a cart"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown subject kind"));
}

#[test]
fn invalid_quality_exits_with_error() {
    cmd()
        .args(["--quality", "ultra", "a dwarf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported quality"));
}

#[test]
fn invalid_aspect_ratio_exits_with_error() {
    cmd()
        .args(["--aspect-ratio", "16:9", "a dwarf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported aspect ratio"));
}

#[test]
fn unconfigured_account_exits_with_error() {
    // No linked account and no key → resolver rejects before any network call
    cmd()
        .arg("a dwarf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No account is linked"));
}

#[test]
fn missing_text_exits_with_error() {
    // Strategy resolution fails first without a config; give the resolver a
    // key via env so the text check is what fires.
    cmd()
        .env("EASEL_API_KEY", "sk-test")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Provide subject text"));
}
