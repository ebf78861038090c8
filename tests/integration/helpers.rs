//! Shared helpers for integration tests

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Directory holding the checked-in test fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read a fixture file to a string.
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

/// Copy a fixture into a fresh temp directory. Keep the `TempDir` alive for
/// as long as the path is used.
pub fn temp_fixture(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::copy(fixtures_dir().join(name), &path).expect("Failed to copy fixture");
    (dir, path)
}

/// Run the cadence binary with colors off and the config file at `config`.
///
/// Returns `(stdout, stderr, exit_code)`.
pub fn run_cadence_with_config(config: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cadence"))
        .args(args)
        .env("NO_COLOR", "1")
        .env("CADENCE_CONFIG", config)
        .env_remove("CADENCE_LOG")
        .output()
        .expect("Failed to execute cadence");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

/// Run the cadence binary against a config path that does not exist, so
/// every setting takes its default.
pub fn run_cadence(args: &[&str]) -> (String, String, i32) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    run_cadence_with_config(&dir.path().join("config.toml"), args)
}
