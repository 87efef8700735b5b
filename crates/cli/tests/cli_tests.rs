//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "wls-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Workload Sizer"),
        "Should show app name"
    );
    assert!(stdout.contains("recommend"), "Should show recommend command");
    assert!(stdout.contains("last"), "Should show last command");
    assert!(stdout.contains("clear"), "Should show clear command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "wls-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("wls"), "Should show binary name");
}

/// Test recommend from-scratch subcommand help
#[test]
fn test_recommend_from_scratch_help() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "wls-cli",
            "--",
            "recommend",
            "from-scratch",
            "--help",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "Recommend from-scratch help should succeed"
    );
    assert!(stdout.contains("--users"), "Should show users option");
    assert!(stdout.contains("--workload"), "Should show workload option");
    assert!(
        stdout.contains("--concurrency"),
        "Should show concurrency option"
    );
}

/// Test recommend existing subcommand help
#[test]
fn test_recommend_existing_help() {
    let output = Command::new("cargo")
        .args([
            "run", "-p", "wls-cli", "--", "recommend", "existing", "--help",
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(
        output.status.success(),
        "Recommend existing help should succeed"
    );
    assert!(stdout.contains("--cpu"), "Should show cpu option");
    assert!(stdout.contains("--ram"), "Should show ram option");
    assert!(stdout.contains("--disk"), "Should show disk option");
}

/// Test recommend file subcommand help
#[test]
fn test_recommend_file_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "wls-cli", "--", "recommend", "file", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Recommend file help should succeed");
    assert!(stdout.contains("PATH"), "Should show path argument");
}

/// Test format option
#[test]
fn test_format_option() {
    let output = Command::new("cargo")
        .args(["run", "-p", "wls-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("table"), "Should show table format");
    assert!(stdout.contains("json"), "Should show json format");
}

/// Test api-url option
#[test]
fn test_api_url_option() {
    let output = Command::new("cargo")
        .args(["run", "-p", "wls-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--api-url"), "Should show api-url option");
    assert!(stdout.contains("WLS_API_URL"), "Should show env var");
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = Command::new("cargo")
        .args(["run", "-p", "wls-cli", "--", "invalid-command"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}

/// Test missing required argument error handling
#[test]
fn test_missing_argument() {
    let output = Command::new("cargo")
        .args(["run", "-p", "wls-cli", "--", "recommend", "existing"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Missing argument should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}
