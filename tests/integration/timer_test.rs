//! Library-level tests: load a file and drive the timer through it

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use cadence::playlist::load_playlist;
use cadence::{Clock, ManualClock, PlaybackTimer, TimerStatus};

use crate::helpers::{fixtures_dir, load_fixture};

const EPOCH: i64 = 1_700_000_000_000;

/// Advance in `step_ms` increments until the timer stops, collecting
/// `(elapsed_ms, label)` for every reported transition.
fn drain(timer: &mut PlaybackTimer<ManualClock>, step_ms: i64) -> Vec<(i64, String)> {
    let mut changes = Vec::new();
    while timer.is_running() {
        timer.clock().advance(step_ms);
        if let Some(segment) = timer.poll_for_segment_change() {
            let label = segment.label.clone();
            changes.push((timer.elapsed_ms(), label));
        }
    }
    changes
}

#[test]
fn workout_file_plays_through_with_a_pause() {
    let playlist = load_playlist(fixtures_dir().join("tempo_ride.toml")).unwrap();
    let clock = ManualClock::new(EPOCH);
    let mut timer = PlaybackTimer::with_clock(clock.clone());
    timer.load(playlist);
    timer.start();

    clock.advance(100_000);
    assert!(timer.poll_for_segment_change().is_none());
    timer.pause();
    assert_eq!(timer.status(), TimerStatus::Paused);

    // Ten minutes off the bike do not count
    clock.advance(600_000);
    assert!(timer.poll_for_segment_change().is_none());
    assert_eq!(timer.elapsed_ms(), 100_000);

    timer.resume();
    let changes = drain(&mut timer, 1_000);

    assert_eq!(
        changes,
        vec![
            (120_000, "2. Steady State @ 95 rpm".to_string()),
            (420_000, "3. Cooldown".to_string()),
        ]
    );
    assert_eq!(timer.status(), TimerStatus::Finished);
    assert!(timer.is_complete());
    assert_eq!(timer.elapsed_ms(), 480_000);
    assert_eq!(clock.now_ms(), EPOCH + 480_000 + 600_000);
}

#[test]
fn snapshot_survives_a_host_restart() {
    let playlist = load_playlist(fixtures_dir().join("two_segments.json")).unwrap();
    let clock = ManualClock::new(EPOCH);

    let mut first = PlaybackTimer::with_clock(clock.clone());
    first.load(playlist.clone());
    first.start();
    clock.advance(70_000);
    assert_eq!(
        first.poll_for_segment_change().map(|s| s.label.as_str()),
        Some("B")
    );
    let saved = first.snapshot();
    drop(first);

    let mut second = PlaybackTimer::with_clock(clock.clone());
    second.load(playlist);
    second.restore(saved);

    assert_eq!(second.current_index(), 1);
    assert_eq!(second.elapsed_ms(), 70_000);
    clock.advance(50_000);
    assert!(second.poll_for_segment_change().is_none());
    assert_eq!(second.status(), TimerStatus::Finished);
}

#[test]
fn closure_clock_drives_timer() {
    let now = Arc::new(AtomicI64::new(EPOCH));
    let source = now.clone();
    let mut timer = PlaybackTimer::with_clock(move || source.load(Ordering::SeqCst));

    let playlist = cadence::playlist::parse_playlist_json(&load_fixture("with_gap.json")).unwrap();
    timer.load(playlist);
    timer.start();

    now.fetch_add(35_000, Ordering::SeqCst);
    assert!(timer.poll_for_segment_change().is_none());
    assert_eq!(timer.current_segment().map(|s| s.label.as_str()), Some("Intervals"));
    assert_eq!(timer.remaining_in_current_segment_secs(), 0);

    now.fetch_add(10_000, Ordering::SeqCst);
    assert_eq!(
        timer.poll_for_segment_change().map(|s| s.label.as_str()),
        Some("Recovery")
    );
    assert_eq!(timer.remaining_in_current_segment_secs(), 45);
}

#[test]
fn stop_then_restart_begins_again() {
    let playlist = load_playlist(fixtures_dir().join("two_segments.json")).unwrap();
    let clock = ManualClock::new(EPOCH);
    let mut timer = PlaybackTimer::with_clock(clock.clone());
    timer.load(playlist);
    timer.start();
    clock.advance(90_000);
    timer.poll_for_segment_change();
    timer.stop();

    assert_eq!(timer.status(), TimerStatus::Idle);
    assert_eq!(timer.elapsed_ms(), 0);

    timer.start();
    assert_eq!(timer.current_index(), 0);
    let changes = drain(&mut timer, 15_000);
    assert_eq!(changes, vec![(60_000, "B".to_string())]);
}
