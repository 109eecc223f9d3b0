//! End-to-end tests for the `aws-google-auth` binary.
//!
//! Invariants:
//! - Every run clears the inherited environment and points the AWS files at a
//!   temporary directory, so the developer's real `~/.aws` is never touched.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE_CONFIG: &str = "\
[profile work]
region = eu-west-1
google_config.google_username = jane@example.com
google_config.google_idp_id = C01abc2de
google_config.google_sp_id = 123456789012
";

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("aws-google-auth");
    cmd.env_clear()
        .env("DOTENV_DISABLED", "1")
        .env("AWS_CONFIG_FILE", dir.path().join("config"))
        .env("AWS_SHARED_CREDENTIALS_FILE", dir.path().join("credentials"));
    cmd
}

#[test]
fn test_help_lists_flags() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--idp-id"))
        .stdout(predicate::str::contains("--ask-role"))
        .stdout(predicate::str::contains("--disable-u2f"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("aws-google-auth "));
}

#[test]
fn test_ask_role_with_role_arn_is_rejected() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["--ask-role", "--role-arn", "arn:aws:iam::123456789012:role/Admin"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_duration_with_auto_duration_is_rejected() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["-d", "3600", "--auto-duration"])
        .assert()
        .code(2);
}

#[test]
fn test_invalid_env_boolean_is_a_validation_error() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .env("AUTO_DURATION", "maybe")
        .args(["-q", "--saml-assertion", "PHNhbWw+"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("AUTO_DURATION"));
}

#[test]
fn test_out_of_range_duration_is_a_validation_error() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["-d", "60", "--saml-assertion", "PHNhbWw+"])
        .assert()
        .code(5);
}

#[test]
fn test_malformed_region_is_a_validation_error() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["-R", "nowhere", "--saml-assertion", "PHNhbWw+"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("region"));
}

#[test]
fn test_profile_settings_reach_the_broker() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config"), SAMPLE_CONFIG).unwrap();

    cmd(&dir)
        .args(["-p", "work", "--saml-assertion", "PHNhbWw+"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not linked"));
}

#[test]
fn test_missing_files_are_created() {
    let dir = TempDir::new().unwrap();

    cmd(&dir)
        .args(["-R", "us-east-1", "--saml-assertion", "PHNhbWw+"])
        .assert()
        .failure();

    assert!(dir.path().join("config").exists());
    assert!(dir.path().join("credentials").exists());
}

#[test]
fn test_prompt_without_terminal_fails() {
    let dir = TempDir::new().unwrap();

    // No region anywhere, so the run must prompt, and there is no terminal.
    cmd(&dir)
        .args(["--saml-assertion", "PHNhbWw+"])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("terminal"));
}
