//! Test assertion helpers.

use std::process::Output;

/// Assert that a command output was successful.
pub fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "Command failed:\nstdout: {}\nstderr: {}",
            stdout(output),
            stderr(output)
        );
    }
}

/// Assert that a command exited with status 1.
pub fn assert_exit_one(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(1),
        "expected exit code 1, stderr: {}",
        stderr(output)
    );
}

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as String.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Assert stderr contains a string.
pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = stderr(output);
    assert!(
        err.contains(expected),
        "stderr missing '{}', got: {}",
        expected,
        err
    );
}

/// Hex payload from the `Encrypted Secrets url result:` line.
pub fn url_result(output: &Output) -> String {
    let out = stdout(output);
    out.lines()
        .find_map(|line| line.strip_prefix("Encrypted Secrets url result: "))
        .unwrap_or_else(|| panic!("no url result in stdout: {}", out))
        .trim()
        .to_string()
}
