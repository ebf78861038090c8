//! Playlist generation: fill each workout block with tracks whose tempo
//! suits the block's cadence.
//!
//! For every playable block, in order:
//! 1. rank the library by [`tempo_distance`] to the block cadence (blocks
//!    without a cadence keep library order);
//! 2. drop tracks already picked for earlier blocks, unless that leaves
//!    nothing, in which case the whole ranking is reused;
//! 3. walk the ranking, adding whole tracks while they fit and cutting one
//!    to fill the rest of the block when at least [`MIN_CLIP_SECS`] remain.
//!
//! Each pick records up to [`MAX_ALTERNATIVES`] runner-up tracks. Blocks may
//! end up partly empty when no track is short enough; the playlist then has
//! a gap there.

mod substitute;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::playlist::{LoadError, Playlist, Segment};
use crate::workout::Workout;

pub use substitute::TrackSubstitutor;

/// Shortest remainder of a block worth filling with a cut-down track.
pub const MIN_CLIP_SECS: u64 = 30;

/// Runner-up tracks kept with each pick.
pub const MAX_ALTERNATIVES: usize = 3;

/// Tolerance band around each cadence multiple, in percent.
const MULTIPLE_TOLERANCE_PERCENT: i64 = 25;

/// Distance given to tracks with no known tempo, after every real match.
const UNKNOWN_TEMPO_DISTANCE: u64 = u64::MAX / 2;

/// A track in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artist: String,
    pub uri: String,
    pub duration_ms: u64,
    /// Tempo in beats per minute, if known
    #[serde(default)]
    pub bpm: Option<u32>,
}

impl Track {
    pub fn duration_secs(&self) -> u64 {
        self.duration_ms / 1000
    }

    /// `"name - artist"`, or just the name without an artist.
    pub fn display_name(&self) -> String {
        if self.artist.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, self.artist)
        }
    }
}

/// Read a JSON array of tracks.
pub fn load_library(path: impl AsRef<Path>) -> Result<Vec<Track>, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    let tracks: Vec<Track> = serde_json::from_str(&content)?;
    debug!(path = %path.display(), tracks = tracks.len(), "loaded track library");
    Ok(tracks)
}

/// How far a tempo is from suiting `cadence`; lower is better.
///
/// Tempos within 25% of 1, 2, 3 or 4 times the cadence (the band scaling
/// with the multiple) score their distance to the nearest such multiple, so
/// 150 BPM suits 75 RPM as well as 75 BPM does. Anything else scores above
/// 30 000, and unknown tempos score last.
pub fn tempo_distance(bpm: Option<u32>, cadence: u32) -> u64 {
    let Some(bpm) = bpm else {
        return UNKNOWN_TEMPO_DISTANCE;
    };
    let bpm = i64::from(bpm);
    let cadence = i64::from(cadence);
    let tolerance = cadence * MULTIPLE_TOLERANCE_PERCENT / 100;

    let best = (1..=4)
        .filter_map(|multiple| {
            let target = cadence * multiple;
            let band = tolerance * multiple;
            ((target - band)..=(target + band))
                .contains(&bpm)
                .then(|| (bpm - target).unsigned_abs())
        })
        .min();
    if let Some(distance) = best {
        return distance;
    }

    let diff = (bpm - cadence).unsigned_abs();
    let near = ((cadence * 3 / 4)..=(cadence * 5 / 4)).contains(&bpm);
    diff + if near { 30_000 } else { 35_000 }
}

/// Library order stably sorted by tempo fit; unchanged without a cadence.
pub fn rank_tracks(tracks: &[Track], cadence: Option<u32>) -> Vec<&Track> {
    let mut ranked: Vec<&Track> = tracks.iter().collect();
    if let Some(cadence) = cadence {
        ranked.sort_by_key(|track| tempo_distance(track.bpm, cadence));
    }
    ranked
}

/// One track placed in the workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSelection {
    pub track: Track,
    /// Position of the block among the workout's playable blocks
    pub block_index: usize,
    pub target_cadence: Option<u32>,
    /// Offsets from the workout start, in seconds
    pub start_secs: u64,
    pub end_secs: u64,
    pub alternatives: Vec<Track>,
}

impl TrackSelection {
    pub fn played_secs(&self) -> u64 {
        self.end_secs - self.start_secs
    }

    /// True when the track was cut short to fit its block.
    pub fn is_clipped(&self) -> bool {
        self.played_secs() < self.track.duration_secs()
    }

    fn to_segment(&self) -> Segment {
        let mut segment = Segment::new(
            self.track.uri.clone(),
            self.start_secs as i64 * 1000,
            self.end_secs as i64 * 1000,
            self.track.display_name(),
        );
        segment.target_cadence = self.target_cadence;
        segment.bpm = self.track.bpm;
        segment
    }
}

/// Result of [`generate_playlist`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPlaylist {
    pub workout_name: String,
    pub selections: Vec<TrackSelection>,
    /// Length of the workout, filled or not
    pub total_duration_secs: u64,
}

impl GeneratedPlaylist {
    /// Segments for the timer, one per selection.
    pub fn to_playlist(&self) -> Playlist {
        self.selections.iter().map(TrackSelection::to_segment).collect()
    }

    /// Replace the track at `index` with the substitutor's next pick for the
    /// same cadence, keeping its slot in the workout.
    pub fn swap(
        &mut self,
        index: usize,
        substitutor: &mut TrackSubstitutor<'_>,
    ) -> Option<&TrackSelection> {
        substitutor.set_playlist_tracks(self.selections.iter().map(|s| s.track.id.clone()));
        let selection = self.selections.get_mut(index)?;
        let replacement = substitutor.next_substitution(&selection.track, selection.target_cadence)?;
        selection.track = replacement.clone();
        Some(&*selection)
    }
}

/// Fill the workout's playable blocks from `library`.
pub fn generate_playlist(workout: &Workout, library: &[Track]) -> GeneratedPlaylist {
    let mut selections = Vec::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut elapsed_secs: u64 = 0;

    for (block_index, block) in workout.playable_blocks().enumerate() {
        let cadence = block.cadence();
        let block_secs = u64::from(block.duration_secs());
        let ranked = rank_tracks(library, cadence);

        let mut candidates: Vec<&Track> = ranked
            .iter()
            .copied()
            .filter(|track| !used.contains(&track.id))
            .collect();
        if candidates.is_empty() {
            debug!(block = block_index + 1, "every track used, allowing reuse");
            candidates = ranked;
        }

        let picked = fill_block(&candidates, block_index, cadence, elapsed_secs, block_secs);
        debug!(
            block = block_index + 1,
            cadence = ?cadence,
            tracks = picked.len(),
            "filled block"
        );
        used.extend(picked.iter().map(|s| s.track.id.clone()));
        selections.extend(picked);
        elapsed_secs += block_secs;
    }

    GeneratedPlaylist {
        workout_name: workout.name.clone(),
        selections,
        total_duration_secs: elapsed_secs,
    }
}

fn fill_block(
    candidates: &[&Track],
    block_index: usize,
    cadence: Option<u32>,
    start_secs: u64,
    block_secs: u64,
) -> Vec<TrackSelection> {
    let mut picked = Vec::new();
    let mut at = start_secs;
    let mut remaining = block_secs;

    for &track in candidates {
        if remaining == 0 {
            break;
        }
        let length = track.duration_secs();
        let played = if length == 0 {
            continue;
        } else if length <= remaining {
            length
        } else if remaining >= MIN_CLIP_SECS {
            remaining
        } else {
            continue;
        };

        let alternatives = candidates
            .iter()
            .filter(|other| other.id != track.id)
            .take(MAX_ALTERNATIVES)
            .map(|other| (*other).clone())
            .collect();

        picked.push(TrackSelection {
            track: track.clone(),
            block_index,
            target_cadence: cadence,
            start_secs: at,
            end_secs: at + played,
            alternatives,
        });
        at += played;
        remaining -= played;
    }

    picked
}
