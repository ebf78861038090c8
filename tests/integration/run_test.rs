//! Integration tests for `cadence run`

use crate::helpers::{fixtures_dir, run_cadence, run_cadence_with_config};

fn fixture_arg(name: &str) -> String {
    fixtures_dir().join(name).to_string_lossy().into_owned()
}

#[test]
fn simulated_demo_run_prints_every_segment_change() {
    let (stdout, _stderr, exit_code) = run_cadence(&["run", "--simulate"]);

    assert_eq!(exit_code, 0);
    insta::assert_snapshot!(stdout.trim_end(), @r"
    Running 3 segment(s) (03:00)
    [00:00] Warmup - Blinding Lights (0s - 60s)
    [01:00] Main - Levitating (60s - 120s)
    [02:00] Cool Down - One Kiss (120s - 180s)
    Workout complete (03:00)
    ");
}

#[test]
fn simulated_run_keeps_segment_through_gap() {
    let path = fixture_arg("with_gap.json");
    let (stdout, _stderr, exit_code) =
        run_cadence(&["run", &path, "--simulate", "--tick-ms", "1000"]);

    assert_eq!(exit_code, 0);
    insta::assert_snapshot!(stdout.trim_end(), @r"
    Running 2 segment(s) (01:30)
    [00:00] Intervals (0s - 30s)
    [00:45] Recovery (45s - 90s)
    Workout complete (01:30)
    ");
}

#[test]
fn simulated_workout_run_walks_blocks() {
    let path = fixture_arg("tempo_ride.toml");
    let (stdout, _stderr, exit_code) =
        run_cadence(&["run", &path, "--simulate", "--tick-ms", "5000"]);

    assert_eq!(exit_code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Running 3 segment(s) (08:00)",
            "[00:00] 1. Warmup @ 85 rpm (0s - 120s)",
            "[02:00] 2. Steady State @ 95 rpm (120s - 420s)",
            "[07:00] 3. Cooldown (420s - 480s)",
            "Workout complete (08:00)",
        ]
    );
}

#[test]
fn coarse_tick_reports_change_at_poll_time() {
    let path = fixture_arg("two_segments.json");
    let (stdout, _stderr, exit_code) =
        run_cadence(&["run", &path, "--simulate", "--tick-ms", "45000"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("[01:30] B (60s - 120s)"));
    assert!(stdout.contains("Workout complete (02:15)"));
}

#[test]
fn tick_from_config_is_used_without_flag() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[timer]\ntick_ms = 45000\n").unwrap();
    let path = fixture_arg("two_segments.json");

    let (stdout, _stderr, exit_code) =
        run_cadence_with_config(&config, &["run", &path, "--simulate"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("[01:30] B (60s - 120s)"));
}

#[test]
fn empty_playlist_does_not_start() {
    let path = fixture_arg("empty.json");
    let (stdout, _stderr, exit_code) = run_cadence(&["run", &path, "--simulate"]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout.trim_end(), "Playlist is empty, nothing to run.");
}

#[test]
fn missing_playlist_exits_1() {
    let (_stdout, stderr, exit_code) = run_cadence(&["run", "/no/such/ride.json", "--simulate"]);

    assert_eq!(exit_code, 1);
    assert!(stderr.contains("Cannot run /no/such/ride.json"));
    assert!(stderr.contains("File not found"));
}

#[test]
fn out_of_range_tick_is_rejected() {
    for tick in ["18446744073709551615", "86400001", "0"] {
        let (stdout, stderr, exit_code) = run_cadence(&["run", "--simulate", "--tick-ms", tick]);

        assert_eq!(exit_code, 2, "--tick-ms {}", tick);
        assert!(stderr.contains("invalid value"));
        assert!(stdout.is_empty());
    }
}

#[test]
fn oversized_config_tick_is_clamped() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[timer]\ntick_ms = 9223372036854775807\n").unwrap();

    let (stdout, _stderr, exit_code) = run_cadence_with_config(&config, &["run", "--simulate"]);

    assert_eq!(exit_code, 0);
    assert!(stdout.contains("[00:00] Warmup - Blinding Lights (0s - 60s)"));
    assert!(stdout.contains("Workout complete (1440:00)"));
}

#[test]
fn zwo_workout_runs_without_ramps() {
    let path = fixture_arg("ramp_test.zwo");
    let (stdout, _stderr, exit_code) =
        run_cadence(&["run", &path, "--simulate", "--tick-ms", "1000"]);

    assert_eq!(exit_code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Running 3 segment(s) (05:00)",
            "[00:00] 1. Warmup @ 85 rpm (0s - 60s)",
            "[01:00] 2. Steady State @ 90 rpm (60s - 240s)",
            "[04:00] 3. Cooldown (240s - 300s)",
            "Workout complete (05:00)",
        ]
    );
}
