//! Cadence to BPM matching.
//!
//! A segment can carry a target pedalling/running cadence (RPM) and the BPM
//! of the track assigned to it. These helpers decide whether the two line up,
//! either directly or through a double/half-time relationship.

use serde::{Deserialize, Serialize};

/// Rules for deciding whether a track's BPM fits a target cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BpmMatchingConfig {
    /// Accept BPMs within tolerance of the cadence itself
    pub exact_match: bool,
    /// Accept BPMs within tolerance of double or half the cadence
    pub multiple_match: bool,
    /// Tolerance band as a percentage of the target cadence
    pub tolerance_percent: u32,
}

impl Default for BpmMatchingConfig {
    fn default() -> Self {
        Self {
            exact_match: true,
            multiple_match: true,
            tolerance_percent: 10,
        }
    }
}

impl BpmMatchingConfig {
    /// Whether `song_bpm` is acceptable for `target_cadence` under these rules.
    pub fn matches(&self, target_cadence: u32, song_bpm: u32) -> bool {
        match (self.exact_match, self.multiple_match) {
            (true, true) => {
                self.matches_exact(target_cadence, song_bpm)
                    || self.matches_multiple(target_cadence, song_bpm)
            }
            (true, false) => self.matches_exact(target_cadence, song_bpm),
            (false, true) => self.matches_multiple(target_cadence, song_bpm),
            (false, false) => false,
        }
    }

    fn tolerance(&self, target_cadence: u32) -> i64 {
        (target_cadence as i64 * self.tolerance_percent as i64) / 100
    }

    fn matches_exact(&self, target_cadence: u32, song_bpm: u32) -> bool {
        within(target_cadence as i64, self.tolerance(target_cadence), song_bpm)
    }

    fn matches_multiple(&self, target_cadence: u32, song_bpm: u32) -> bool {
        let tolerance = self.tolerance(target_cadence);
        let target = target_cadence as i64;
        [target, target * 2, target / 2]
            .into_iter()
            .any(|t| within(t, tolerance, song_bpm))
    }
}

fn within(target: i64, tolerance: i64, bpm: u32) -> bool {
    let bpm = bpm as i64;
    bpm >= target - tolerance && bpm <= target + tolerance
}

/// Score how well `song_bpm` fits `target_cadence`, from 0 to 100.
///
/// Exact hits score 100, double-time 90, half-time 85. Anything else decays
/// linearly to 0 at a 20% difference.
pub fn match_score(target_cadence: u32, song_bpm: u32) -> f64 {
    if target_cadence == 0 {
        return 0.0;
    }
    if song_bpm == target_cadence {
        return 100.0;
    }
    if song_bpm == target_cadence * 2 {
        return 90.0;
    }
    if song_bpm == target_cadence / 2 {
        return 85.0;
    }

    let diff = (song_bpm as f64 - target_cadence as f64).abs();
    let max_diff = target_cadence as f64 * 0.2;
    if diff <= max_diff {
        100.0 * (1.0 - diff / max_diff)
    } else {
        0.0
    }
}
