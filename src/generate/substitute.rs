//! Swapping tracks out of a generated playlist.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::{tempo_distance, Track};

/// Hands out replacement tracks, cycling through the library ranked for each
/// cadence.
///
/// Every cadence keeps its own position in its ranking, so repeated requests
/// walk down the list instead of returning the same best match. Tracks that
/// are already in the playlist are passed over while anything else is left.
#[derive(Debug)]
pub struct TrackSubstitutor<'a> {
    tracks: &'a [Track],
    /// Library indices sorted by tempo fit, per cadence
    rankings: HashMap<u32, Vec<usize>>,
    /// Next ranking position per cadence; `None` is plain library order
    cursors: HashMap<Option<u32>, usize>,
    in_playlist: HashSet<String>,
    usage: HashMap<String, u32>,
}

impl<'a> TrackSubstitutor<'a> {
    pub fn new(tracks: &'a [Track]) -> Self {
        Self {
            tracks,
            rankings: HashMap::new(),
            cursors: HashMap::new(),
            in_playlist: HashSet::new(),
            usage: HashMap::new(),
        }
    }

    /// Replace the set of track ids currently in the playlist.
    pub fn set_playlist_tracks<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.in_playlist = ids.into_iter().map(Into::into).collect();
        debug!(tracks = self.in_playlist.len(), "updated playlist tracks");
    }

    /// Next replacement for `current`.
    ///
    /// With a cadence, the next track in that cadence's ranking that is
    /// neither `current` nor already in the playlist (or, when every track
    /// is, simply the next one). Without a cadence, the next track in library
    /// order. `None` only for an empty library.
    pub fn next_substitution(&mut self, current: &Track, cadence: Option<u32>) -> Option<&'a Track> {
        let tracks = self.tracks;
        if tracks.is_empty() {
            warn!("no tracks to substitute from");
            return None;
        }

        let Some(cadence) = cadence else {
            let cursor = self.cursors.entry(None).or_insert(0);
            let next = &tracks[*cursor % tracks.len()];
            *cursor = (*cursor + 1) % tracks.len();
            return Some(next);
        };

        let ranking = self.rankings.entry(cadence).or_insert_with(|| {
            let mut order: Vec<usize> = (0..tracks.len()).collect();
            order.sort_by_key(|&i| tempo_distance(tracks[i].bpm, cadence));
            order
        });
        let len = ranking.len();

        let mut position = self.cursors.get(&Some(cadence)).copied().unwrap_or(0);
        let mut next = &tracks[ranking[position]];
        let mut attempts = 0;
        while (next.id == current.id || self.in_playlist.contains(&next.id)) && attempts < len {
            position = (position + 1) % len;
            next = &tracks[ranking[position]];
            attempts += 1;
        }

        self.cursors.insert(Some(cadence), (position + 1) % len);
        *self.usage.entry(next.id.clone()).or_insert(0) += 1;
        debug!(
            from = %current.name,
            to = %next.name,
            cadence,
            bpm = ?next.bpm,
            "substituting track"
        );
        Some(next)
    }

    /// How many times `id` has been handed out for a cadence.
    pub fn usage_count(&self, id: &str) -> u32 {
        self.usage.get(id).copied().unwrap_or(0)
    }

    pub fn total_substitutions(&self) -> u32 {
        self.usage.values().sum()
    }

    /// Forget rankings, positions and usage. The playlist set is kept.
    pub fn reset(&mut self) {
        self.rankings.clear();
        self.cursors.clear();
        self.usage.clear();
        debug!("substitutor reset");
    }
}
