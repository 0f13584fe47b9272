//! Integration test: Verify binary prints correct version

use std::process::Command;

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_calgrid"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(
        stdout.contains("0.1.0"),
        "Expected output to contain version '0.1.0', but got: {}",
        stdout
    );
}

#[test]
fn missing_records_file_fails() {
    let log_dir = std::env::temp_dir().join("calgrid_version_test_logs");
    let output = Command::new(env!("CARGO_BIN_EXE_calgrid"))
        .arg("/nonexistent/calgrid/records.json")
        .env("CALGRID_CONFIG", "/nonexistent/calgrid/config.toml")
        .env("HOME", &log_dir)
        .env("XDG_STATE_HOME", &log_dir)
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("FileNotFound"),
        "Expected a file-not-found error, got: {}",
        stderr
    );
    let _ = std::fs::remove_dir_all(log_dir);
}
