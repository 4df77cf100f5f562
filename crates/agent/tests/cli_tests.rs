//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "healthmon", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Health monitoring agent"),
        "Should show app description"
    );
    assert!(stdout.contains("monitor"), "Should show monitor command");
    assert!(stdout.contains("detect-vm"), "Should show detect-vm command");
    assert!(stdout.contains("config"), "Should show config command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "healthmon", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("healthmon"), "Should show binary name");
}

/// Test monitor subcommand help
#[test]
fn test_monitor_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "healthmon", "--", "monitor", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Monitor help should succeed");
    assert!(stdout.contains("--log-file"), "Should show log-file option");
}

/// Test detect-vm subcommand help
#[test]
fn test_detect_vm_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "healthmon", "--", "detect-vm", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Detect-vm help should succeed");
    assert!(
        stdout.contains("--root-password"),
        "Should show root-password option"
    );
    assert!(
        stdout.contains("HEALTHMON_ROOT_PASSWORD"),
        "Should show env var"
    );
}

/// Test config subcommand help
#[test]
fn test_config_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "healthmon", "--", "config", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Config help should succeed");
    assert!(stdout.contains("show"), "Should show the show subcommand");
    assert!(stdout.contains("set"), "Should show the set subcommand");
    assert!(
        stdout.contains("discover"),
        "Should show the discover subcommand"
    );
}

/// Monitor mode without a log path is a configuration error
#[test]
fn test_monitor_requires_log_path() {
    let output = Command::new("cargo")
        .args(["run", "-p", "healthmon", "--", "monitor"])
        .env_remove("HEALTHMON_LOG_PATH")
        .output()
        .expect("Failed to execute command");

    assert!(
        !output.status.success(),
        "Monitor without a log path should fail"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("log path") || stderr.contains("HEALTHMON_LOG_PATH"),
        "Should point at the missing log path"
    );
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = Command::new("cargo")
        .args(["run", "-p", "healthmon", "--", "invalid-command"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}
