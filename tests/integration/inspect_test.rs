//! Integration tests for `cadence inspect`

use crate::helpers::{fixtures_dir, run_cadence, temp_fixture};

fn fixture_arg(name: &str) -> String {
    fixtures_dir().join(name).to_string_lossy().into_owned()
}

#[test]
fn inspect_json_playlist_shows_cadence_match() {
    let path = fixture_arg("with_gap.json");
    let (stdout, _stderr, exit_code) = run_cadence(&["inspect", &path]);

    assert_eq!(exit_code, 0);
    insta::assert_snapshot!(stdout.trim_end(), @r"
    #  RANGE        LABEL      CADENCE  BPM  MATCH
    1  00:00-00:30  Intervals       95  190  yes
    2  00:45-01:30  Recovery        80  128  no
    Total: 01:30 (2 segments)
    ");
}

#[test]
fn inspect_workout_prints_header_and_blocks() {
    let path = fixture_arg("tempo_ride.toml");
    let (stdout, _stderr, exit_code) = run_cadence(&["inspect", &path]);

    assert_eq!(exit_code, 0);
    assert!(stdout.starts_with("Tempo ride\nby coach\nWarm up, hold tempo, spin out\n"));
    assert!(stdout.contains("1. Warmup @ 85 rpm"));
    assert!(stdout.contains("2. Steady State @ 95 rpm"));
    assert!(stdout.contains("3. Cooldown"));
    assert!(stdout.contains("Total: 08:00 (3 segments)"));
}

#[test]
fn inspect_uppercase_extension_is_accepted() {
    let (dir, path) = temp_fixture("two_segments.json");
    let upper = dir.path().join("TWO.JSON");
    std::fs::rename(&path, &upper).unwrap();

    let (stdout, _stderr, exit_code) = run_cadence(&["inspect", upper.to_str().unwrap()]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("Total: 02:00 (2 segments)"));
}

#[test]
fn inspect_empty_playlist_shows_zero_total() {
    let path = fixture_arg("empty.json");
    let (stdout, _stderr, exit_code) = run_cadence(&["inspect", &path]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("Total: 00:00 (0 segments)"));
}

// ============================================================================
// Error Handling
// ============================================================================

#[test]
fn inspect_missing_file_exits_1() {
    let (_stdout, stderr, exit_code) = run_cadence(&["inspect", "/no/such/playlist.json"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("File not found"));
    assert!(stderr.contains("/no/such/playlist.json"));
}

#[test]
fn inspect_unsupported_extension_exits_1() {
    let (dir, path) = temp_fixture("two_segments.json");
    let txt = dir.path().join("playlist.txt");
    std::fs::rename(&path, &txt).unwrap();

    let (_stdout, stderr, exit_code) = run_cadence(&["inspect", txt.to_str().unwrap()]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Unsupported playlist format 'txt'"));
}

#[test]
fn inspect_malformed_json_exits_1() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "[{\"uri\": ").unwrap();

    let (_stdout, stderr, exit_code) = run_cadence(&["inspect", path.to_str().unwrap()]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Invalid playlist JSON"));
}

#[test]
fn inspect_requires_file_argument() {
    let (_stdout, stderr, exit_code) = run_cadence(&["inspect"]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("<FILE>"));
}

#[test]
fn inspect_zwo_workout_lists_supported_blocks() {
    let path = fixture_arg("ramp_test.zwo");
    let (stdout, _stderr, exit_code) = run_cadence(&["inspect", &path]);

    assert_eq!(exit_code, 0);
    assert!(stdout.starts_with("Ramp & hold\nby coach\nRamps are skipped, the rest is played\n"));
    assert!(stdout.contains("00:00-01:00  1. Warmup @ 85 rpm"));
    assert!(stdout.contains("01:00-04:00  2. Steady State @ 90 rpm"));
    assert!(stdout.contains("04:00-05:00  3. Cooldown"));
    assert!(stdout.contains("Total: 05:00 (3 segments)"));
}

#[test]
fn inspect_toml_workout_skips_unknown_block_types() {
    let path = fixture_arg("with_ramp.toml");
    let (stdout, stderr, exit_code) = run_cadence(&["inspect", &path]);

    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("1. Warmup @ 85 rpm"));
    assert!(stdout.contains("01:00-02:00  2. Cooldown"));
    assert!(stdout.contains("Total: 02:00 (2 segments)"));
}
