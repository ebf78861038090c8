//! Segments and playlists.
//!
//! A [`Segment`] is one timed slot of a workout, covering the half-open range
//! `[start_ms, end_ms)` on the workout clock. A [`Playlist`] is the ordered
//! list of segments the timer walks through.
//!
//! Playlists are expected to be sorted by time and free of overlaps. Nothing
//! here enforces that; callers that build playlists by hand own the ordering.

mod load;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bpm::{self, BpmMatchingConfig};

pub use load::{load_playlist, parse_playlist_json, LoadError};

/// One timed slot in a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Opaque identifier of the track played during this segment
    pub uri: String,
    /// Offset from workout start where the segment begins (inclusive)
    pub start_ms: i64,
    /// Offset from workout start where the segment ends (exclusive)
    pub end_ms: i64,
    /// Human readable label, e.g. the workout block and track name
    pub label: String,
    /// Target cadence in RPM for this part of the workout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cadence: Option<u32>,
    /// Tempo of the assigned track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u32>,
}

impl Segment {
    pub fn new(uri: impl Into<String>, start_ms: i64, end_ms: i64, label: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            start_ms,
            end_ms,
            label: label.into(),
            target_cadence: None,
            bpm: None,
        }
    }

    pub fn with_cadence(mut self, target_cadence: u32) -> Self {
        self.target_cadence = Some(target_cadence);
        self
    }

    pub fn with_bpm(mut self, bpm: u32) -> Self {
        self.bpm = Some(bpm);
        self
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Whether `elapsed_ms` falls inside `[start_ms, end_ms)`.
    pub fn contains(&self, elapsed_ms: i64) -> bool {
        elapsed_ms >= self.start_ms && elapsed_ms < self.end_ms
    }

    /// Whether the track tempo fits the target cadence.
    ///
    /// `None` when either value is missing.
    pub fn cadence_match(&self, config: &BpmMatchingConfig) -> Option<bool> {
        Some(config.matches(self.target_cadence?, self.bpm?))
    }

    /// Match quality between track tempo and target cadence (0 to 100).
    pub fn cadence_score(&self) -> Option<f64> {
        Some(bpm::match_score(self.target_cadence?, self.bpm?))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}s - {}s)",
            self.label,
            self.start_ms / 1000,
            self.end_ms / 1000
        )
    }
}

/// Ordered, immutable list of segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Playlist {
    segments: Vec<Segment>,
}

impl Playlist {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// End of the last segment in playlist order, or 0 when empty.
    ///
    /// This is deliberately not the maximum `end_ms`: a playlist is assumed
    /// to be sorted, and an unsorted one reports whatever its last entry says.
    pub fn total_duration_ms(&self) -> i64 {
        self.segments.last().map(|s| s.end_ms).unwrap_or(0)
    }

    /// Index of the first segment containing `elapsed_ms`.
    ///
    /// Segments are scanned in order, so with shared boundaries the instant
    /// `end_ms == next.start_ms` resolves to the later segment.
    pub fn find_active(&self, elapsed_ms: i64) -> Option<usize> {
        self.segments.iter().position(|s| s.contains(elapsed_ms))
    }
}

impl From<Vec<Segment>> for Playlist {
    fn from(segments: Vec<Segment>) -> Self {
        Self::new(segments)
    }
}

impl FromIterator<Segment> for Playlist {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Canned three-track workout, one minute per track.
pub fn demo_playlist() -> Playlist {
    Playlist::new(vec![
        Segment::new(
            "spotify:track:1301WleyT98MSxVHnAlFYp",
            0,
            60_000,
            "Warmup - Blinding Lights",
        ),
        Segment::new(
            "spotify:track:0VjIjW4GlUZAMYd2vXMwbU",
            60_000,
            120_000,
            "Main - Levitating",
        ),
        Segment::new(
            "spotify:track:4cOdK2wGLETKBW3PvgPWqLv",
            120_000,
            180_000,
            "Cool Down - One Kiss",
        ),
    ])
}
