//! Integration tests for CLI argument handling and error reporting.
//!
//! These run the built `tofu` binary with an isolated HOME so no user config
//! is picked up. None of them reach the network.

use std::path::PathBuf;
use std::process::{Command, Output};

fn setup_test_home(test_name: &str) -> PathBuf {
    let unique_id = format!(
        "{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    );
    let temp_home = std::env::temp_dir().join(format!("tofu_test_{}_{}", test_name, unique_id));
    std::fs::create_dir_all(&temp_home).expect("Failed to create test home");
    temp_home
}

fn run_tofu(home: &PathBuf, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tofu"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute 'tofu'")
}

#[test]
fn test_invalid_fingerprint_exits_nonzero() {
    let home = setup_test_home("invalid_fp");
    let output = run_tofu(&home, &["get", "127.0.0.1:1", "--fingerprint", "not-hex"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid fingerprint"),
        "stderr should explain the problem, got: {}",
        stderr
    );
}

#[test]
fn test_invalid_address_exits_nonzero() {
    let home = setup_test_home("invalid_addr");
    let output = run_tofu(&home, &["fingerprints", "host:notaport"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to get fingerprints"), "got: {}", stderr);
    assert!(stderr.contains("invalid port"), "got: {}", stderr);
}

#[test]
fn test_missing_explicit_config_exits_nonzero() {
    let home = setup_test_home("missing_config");
    let config = home.join("absent.toml");
    let output = run_tofu(
        &home,
        &[
            "fingerprints",
            "127.0.0.1:1",
            "--config",
            config.to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to load configuration"),
        "got: {}",
        stderr
    );
}

#[test]
fn test_no_subcommand_shows_help() {
    let home = setup_test_home("no_subcommand");
    let output = run_tofu(&home, &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fingerprints"), "got: {}", stderr);
}
