//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "kubespend-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("cost analysis and optimization"),
        "Should show app description"
    );
    assert!(stdout.contains("analyze"), "Should show analyze command");
    assert!(stdout.contains("gpu"), "Should show gpu command");
    assert!(stdout.contains("optimize"), "Should show optimize command");
    assert!(stdout.contains("visualize"), "Should show visualize command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "kubespend-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("kubespend"), "Should show binary name");
}

/// Test global flags
#[test]
fn test_global_flags() {
    let output = Command::new("cargo")
        .args(["run", "-p", "kubespend-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        stdout.contains("--namespace"),
        "Should show namespace option"
    );
    assert!(
        stdout.contains("--all-namespaces"),
        "Should show all-namespaces option"
    );
    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("table"), "Should show table format");
    assert!(stdout.contains("json"), "Should show json format");
    assert!(stdout.contains("yaml"), "Should show yaml format");
    assert!(
        stdout.contains("--kubeconfig"),
        "Should show kubeconfig option"
    );
    assert!(stdout.contains("KUBECONFIG"), "Should show env var");
    assert!(stdout.contains("--config"), "Should show config option");
}

/// Test analyze subcommand help
#[test]
fn test_analyze_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "kubespend-cli", "--", "analyze", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Analyze help should succeed");
    assert!(
        stdout.contains("--breakdown"),
        "Should show breakdown option"
    );
    assert!(stdout.contains("--top"), "Should show top option");
}

/// Test visualize subcommand help
#[test]
fn test_visualize_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "kubespend-cli", "--", "visualize", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Visualize help should succeed");
    assert!(stdout.contains("--type"), "Should show type option");
    assert!(stdout.contains("pods"), "Should show pods kind");
    assert!(stdout.contains("nodes"), "Should show nodes kind");
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = Command::new("cargo")
        .args(["run", "-p", "kubespend-cli", "--", "invalid-command"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}

/// Test invalid format value error handling
#[test]
fn test_invalid_format() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "kubespend-cli",
            "--",
            "analyze",
            "--format",
            "xml",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid format should fail");
}
