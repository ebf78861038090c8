//! Structured workout definitions.
//!
//! A workout is a sequence of blocks (warmup, steady state, cooldown), each
//! with a duration in seconds and an optional target cadence. Workouts are
//! written as TOML:
//!
//! ```toml
//! name = "Tempo ride"
//! author = "coach"
//!
//! [[blocks]]
//! type = "warmup"
//! duration = 300
//! power_low = 0.5
//! power_high = 0.75
//! cadence = 85
//!
//! [[blocks]]
//! type = "steady_state"
//! duration = 600
//! power = 0.9
//! cadence = 95
//! messages = [{ time_offset = 10, message = "Settle in" }]
//! ```
//!
//! Zwift `.zwo` files are read by [`Workout::from_zwo_str`]. In both formats
//! block kinds other than the three above are kept as
//! [`WorkoutBlock::Unsupported`] and left out of the playlist, and a missing
//! duration counts as zero.
//!
//! [`Workout::to_playlist`] lays the blocks end to end so the timer can walk
//! through them like any other playlist.

mod zwo;

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::playlist::{Playlist, Segment};

pub use zwo::ZwoError;

/// A text cue shown `time_offset` seconds into a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEvent {
    pub time_offset: u32,
    pub message: String,
}

/// One block of a workout. Durations are in seconds, power as a fraction of FTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkoutBlock {
    Warmup {
        #[serde(default)]
        duration: u32,
        #[serde(default)]
        power_low: f64,
        #[serde(default)]
        power_high: f64,
        #[serde(default)]
        cadence: Option<u32>,
    },
    SteadyState {
        #[serde(default)]
        duration: u32,
        #[serde(default)]
        power: f64,
        #[serde(default)]
        cadence: Option<u32>,
        #[serde(default)]
        messages: Vec<TextEvent>,
    },
    Cooldown {
        #[serde(default)]
        duration: u32,
        #[serde(default)]
        power_low: f64,
        #[serde(default)]
        power_high: f64,
        #[serde(default)]
        cadence: Option<u32>,
    },
    /// Any other block kind (ramps, interval sets, free ride)
    #[serde(other)]
    Unsupported,
}

impl WorkoutBlock {
    pub fn duration_secs(&self) -> u32 {
        match self {
            Self::Warmup { duration, .. }
            | Self::SteadyState { duration, .. }
            | Self::Cooldown { duration, .. } => *duration,
            Self::Unsupported => 0,
        }
    }

    pub fn cadence(&self) -> Option<u32> {
        match self {
            Self::Warmup { cadence, .. }
            | Self::SteadyState { cadence, .. }
            | Self::Cooldown { cadence, .. } => *cadence,
            Self::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    /// Display name of the block kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Warmup { .. } => "Warmup",
            Self::SteadyState { .. } => "Steady State",
            Self::Cooldown { .. } => "Cooldown",
            Self::Unsupported => "Unsupported",
        }
    }
}

impl fmt::Display for WorkoutBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cadence() {
            Some(rpm) => write!(f, "{} @ {} rpm", self.kind(), rpm),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// A complete workout definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub blocks: Vec<WorkoutBlock>,
}

fn is_zwo(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zwo"))
}

impl Workout {
    /// Parse a workout from TOML.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Parse a Zwift workout (`<workout_file>` XML).
    pub fn from_zwo_str(content: &str) -> std::result::Result<Self, ZwoError> {
        zwo::parse(content)
    }

    /// Read and parse a workout file: `.zwo` as Zwift XML, anything else as
    /// TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read workout: {}", path.display()))?;
        if is_zwo(path) {
            Self::from_zwo_str(&content)
                .with_context(|| format!("Failed to parse workout: {}", path.display()))
        } else {
            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse workout: {}", path.display()))
        }
    }

    /// Blocks that become playlist segments, in order.
    pub fn playable_blocks(&self) -> impl Iterator<Item = &WorkoutBlock> {
        self.blocks.iter().filter(|b| b.is_supported())
    }

    /// Sum of all playable block durations, in seconds.
    pub fn total_duration_secs(&self) -> u64 {
        self.playable_blocks().map(|b| b.duration_secs() as u64).sum()
    }

    /// Lay the blocks end to end as one segment each.
    pub fn to_playlist(&self) -> Playlist {
        let skipped = self.blocks.len() - self.playable_blocks().count();
        if skipped > 0 {
            debug!(skipped, "skipping unsupported workout blocks");
        }

        let mut start_ms: i64 = 0;
        self.playable_blocks()
            .enumerate()
            .map(|(i, block)| {
                let end_ms = start_ms + block.duration_secs() as i64 * 1000;
                let segment = Segment {
                    uri: format!("block:{}", i + 1),
                    start_ms,
                    end_ms,
                    label: format!("{}. {}", i + 1, block),
                    target_cadence: block.cadence(),
                    bpm: None,
                };
                start_ms = end_ms;
                segment
            })
            .collect()
    }
}
