//! Integration tests for `cadence demo` and top-level CLI behavior

use assert_cmd::Command;
use predicates::prelude::*;

use cadence::playlist::{demo_playlist, parse_playlist_json};

use crate::helpers::run_cadence;

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn help_lists_subcommands() {
    let (stdout, _stderr, exit_code) = run_cadence(&["--help"]);

    assert_eq!(exit_code, 0);
    for command in ["demo", "inspect", "run", "config", "completions"] {
        assert!(stdout.contains(command), "missing {} in help", command);
    }
}

#[test]
fn version_includes_package_version() {
    Command::cargo_bin("cadence")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_subcommand_is_usage_error() {
    let (_stdout, stderr, exit_code) = run_cadence(&[]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("Usage"));
}

// ============================================================================
// Demo Output
// ============================================================================

#[test]
fn demo_prints_segment_table() {
    let (stdout, _stderr, exit_code) = run_cadence(&["demo"]);

    assert_eq!(exit_code, 0);
    insta::assert_snapshot!(stdout.trim_end(), @r"
    #  RANGE        LABEL                     CADENCE  BPM  MATCH
    1  00:00-01:00  Warmup - Blinding Lights        -    -  -
    2  01:00-02:00  Main - Levitating               -    -  -
    3  02:00-03:00  Cool Down - One Kiss            -    -  -
    Total: 03:00 (3 segments)
    ");
}

#[test]
fn demo_json_parses_back_to_demo_playlist() {
    let (stdout, _stderr, exit_code) = run_cadence(&["demo", "--json"]);

    assert_eq!(exit_code, 0);
    let playlist = parse_playlist_json(&stdout).expect("demo --json should be valid");
    assert_eq!(playlist, demo_playlist());
}

// ============================================================================
// Completions
// ============================================================================

#[test]
fn completions_bash_mentions_binary() {
    let (stdout, _stderr, exit_code) = run_cadence(&["completions", "bash"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("cadence"));
    assert!(stdout.contains("inspect"));
}

#[test]
fn completions_unknown_shell_is_rejected() {
    let (_stdout, stderr, exit_code) = run_cadence(&["completions", "tcsh"]);

    assert_eq!(exit_code, 2);
    assert!(stderr.contains("invalid value"));
}
