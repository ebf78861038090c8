//! Playback timer: elapsed-time accounting and segment switching.
//!
//! [`TimerState`] is a small `Copy` value whose transitions are pure
//! functions of `(state, now)`. [`PlaybackTimer`] owns a playlist, a clock
//! and the current state, and applies those transitions with the clock's
//! reading. Callers poll the timer from their own loop (a UI tick, an audio
//! sync timer) and react when [`PlaybackTimer::poll_for_segment_change`]
//! reports a new segment.
//!
//! The timer never fails. Empty playlists, resumes without a pause and
//! queries before `start` all produce neutral values.
//!
//! # Example
//!
//! ```
//! use cadence::clock::ManualClock;
//! use cadence::playlist::demo_playlist;
//! use cadence::timer::PlaybackTimer;
//!
//! let clock = ManualClock::new(1_000_000);
//! let mut timer = PlaybackTimer::with_clock(clock.clone());
//! timer.load(demo_playlist());
//! timer.start();
//!
//! clock.advance(60_000);
//! let next = timer.poll_for_segment_change().map(|s| s.label.clone());
//! assert_eq!(next.as_deref(), Some("Main - Levitating"));
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::playlist::{Playlist, Segment};

/// Coarse lifecycle of a timer, derived from [`TimerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    /// Never started, or stopped
    Idle,
    Running,
    Paused,
    /// Ran past the end of the playlist
    Finished,
}

/// Snapshot of the timer's clock accounting.
///
/// All instants are epoch milliseconds as reported by a [`Clock`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Instant `start` was called; `None` until then
    pub origin_ms: Option<i64>,
    pub running: bool,
    /// Instant of the most recent pause that has not been resumed
    pub paused_at_ms: Option<i64>,
    /// Time spent paused since `start`
    pub total_paused_ms: i64,
    pub current_index: usize,
    /// Instant a poll found the workout over; freezes elapsed time
    pub finished_at_ms: Option<i64>,
}

impl TimerState {
    /// Fresh running state anchored at `now_ms`.
    pub fn started(now_ms: i64) -> Self {
        Self {
            origin_ms: Some(now_ms),
            running: true,
            ..Self::default()
        }
    }

    /// Record a pause point.
    ///
    /// Pausing an already paused timer moves the pause point to `now_ms`, so
    /// the time between the two pauses is counted as elapsed. Idle and
    /// finished timers are left alone.
    pub fn paused(self, now_ms: i64) -> Self {
        if self.origin_ms.is_none() || self.finished_at_ms.is_some() {
            return self;
        }
        Self {
            running: false,
            paused_at_ms: Some(now_ms),
            ..self
        }
    }

    /// Fold the pending pause into `total_paused_ms` and run again.
    ///
    /// Only applies when not running and a pause point exists.
    pub fn resumed(self, now_ms: i64) -> Self {
        match (self.running, self.paused_at_ms) {
            (false, Some(paused_at)) => Self {
                running: true,
                paused_at_ms: None,
                total_paused_ms: self.total_paused_ms + (now_ms - paused_at),
                ..self
            },
            _ => self,
        }
    }

    /// Back to idle.
    pub fn stopped(self) -> Self {
        Self::default()
    }

    /// Elapsed workout time at `now_ms`, net of pauses.
    ///
    /// Zero before `start`. While paused (or once finished) the value is
    /// frozen at the pause (or finish) instant. Clock anomalies can make it
    /// negative.
    pub fn elapsed_ms(&self, now_ms: i64) -> i64 {
        let Some(origin) = self.origin_ms else {
            return 0;
        };
        if self.running {
            return now_ms - origin - self.total_paused_ms;
        }
        match self.paused_at_ms.or(self.finished_at_ms) {
            Some(frozen_at) => frozen_at - origin - self.total_paused_ms,
            None => 0,
        }
    }

    pub fn status(&self) -> TimerStatus {
        match (self.origin_ms, self.running, self.finished_at_ms) {
            (None, _, _) => TimerStatus::Idle,
            (Some(_), true, _) => TimerStatus::Running,
            (Some(_), false, Some(_)) => TimerStatus::Finished,
            (Some(_), false, None) => TimerStatus::Paused,
        }
    }

    /// Decide which segment should be active at `now_ms`.
    ///
    /// Returns the updated state and, on a transition, the index of the newly
    /// active segment. Reaching the end of the playlist stops the clock but
    /// keeps the origin, so the workout reads as finished rather than idle.
    pub fn polled(self, playlist: &Playlist, now_ms: i64) -> (Self, Option<usize>) {
        if !self.running || playlist.is_empty() {
            return (self, None);
        }

        let elapsed = self.elapsed_ms(now_ms);
        match playlist.find_active(elapsed) {
            Some(index) if index != self.current_index => (
                Self {
                    current_index: index,
                    ..self
                },
                Some(index),
            ),
            Some(_) => (self, None),
            None if elapsed >= playlist.total_duration_ms() => (
                Self {
                    running: false,
                    finished_at_ms: Some(now_ms),
                    ..self
                },
                None,
            ),
            // Gap between segments: keep the current index
            None => (self, None),
        }
    }
}

/// Timer that walks a playlist as wall-clock time passes.
///
/// Single-consumer: every mutating call takes `&mut self`. Hosts sharing a
/// timer across threads must wrap the whole thing in one lock.
#[derive(Debug, Clone)]
pub struct PlaybackTimer<C: Clock = SystemClock> {
    playlist: Playlist,
    state: TimerState,
    clock: C,
}

impl Default for PlaybackTimer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackTimer<SystemClock> {
    /// Timer on the system wall clock with an empty playlist.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> PlaybackTimer<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            playlist: Playlist::default(),
            state: TimerState::default(),
            clock,
        }
    }

    /// Replace the playlist. Running state is untouched.
    pub fn load(&mut self, playlist: impl Into<Playlist>) {
        self.playlist = playlist.into();
        debug!(segments = self.playlist.len(), "playlist loaded");
    }

    /// Start from zero: origin at now, first segment, no pause debt.
    pub fn start(&mut self) {
        self.state = TimerState::started(self.clock.now_ms());
        info!(
            segments = self.playlist.len(),
            total_ms = self.total_duration_ms(),
            "workout started"
        );
    }

    pub fn pause(&mut self) {
        let now = self.clock.now_ms();
        self.state = self.state.paused(now);
        debug!(elapsed_ms = self.state.elapsed_ms(now), "paused");
    }

    pub fn resume(&mut self) {
        let now = self.clock.now_ms();
        self.state = self.state.resumed(now);
        debug!(
            total_paused_ms = self.state.total_paused_ms,
            running = self.state.running,
            "resume requested"
        );
    }

    pub fn stop(&mut self) {
        self.state = self.state.stopped();
        info!("workout stopped");
    }

    /// Elapsed time in milliseconds, net of pauses.
    pub fn elapsed_ms(&self) -> i64 {
        self.state.elapsed_ms(self.clock.now_ms())
    }

    /// Check whether the active segment changed since the last poll.
    ///
    /// Returns the new segment on a transition, `None` otherwise (including
    /// when the workout has just finished).
    pub fn poll_for_segment_change(&mut self) -> Option<&Segment> {
        let now = self.clock.now_ms();
        let was_running = self.state.running;
        let (next, transition) = self.state.polled(&self.playlist, now);
        self.state = next;

        if was_running && self.state.status() == TimerStatus::Finished {
            info!(elapsed_ms = self.state.elapsed_ms(now), "workout complete");
        }

        let segment = self.playlist.get(transition?)?;
        debug!(
            index = self.state.current_index,
            label = %segment.label,
            "segment changed"
        );
        Some(segment)
    }

    /// Segment at the current index, if any.
    pub fn current_segment(&self) -> Option<&Segment> {
        self.playlist.get(self.state.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn segment_count(&self) -> usize {
        self.playlist.len()
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// End of the last playlist entry, in milliseconds.
    pub fn total_duration_ms(&self) -> i64 {
        self.playlist.total_duration_ms()
    }

    pub fn total_duration_secs(&self) -> i64 {
        self.total_duration_ms() / 1000
    }

    /// Elapsed time as a fraction of the total duration; 0 when the playlist
    /// has no duration.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.total_duration_ms();
        if total == 0 {
            return 0.0;
        }
        self.elapsed_ms() as f64 / total as f64
    }

    /// Whole seconds left in the current segment, never negative.
    pub fn remaining_in_current_segment_secs(&self) -> i64 {
        match self.current_segment() {
            Some(segment) => ((segment.end_ms - self.elapsed_ms()) / 1000).max(0),
            None => 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// True once a started workout has stopped running past its end.
    pub fn is_complete(&self) -> bool {
        !self.state.running
            && self.state.origin_ms.is_some()
            && self.elapsed_ms() >= self.total_duration_ms()
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status()
    }

    /// Copy of the current clock accounting.
    pub fn snapshot(&self) -> TimerState {
        self.state
    }

    /// Replace the clock accounting with a previously taken snapshot.
    pub fn restore(&mut self, state: TimerState) {
        self.state = state;
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
