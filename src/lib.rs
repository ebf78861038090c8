//! Cadence - workout playback timer
//!
//! Tracks elapsed wall-clock time (net of pauses) against a playlist of
//! timed segments and reports when the active segment changes.
//!
//! - [`timer`]: the [`PlaybackTimer`] state machine and its [`TimerState`] snapshot
//! - [`clock`]: injectable time sources
//! - [`playlist`]: segments, playlists and file loading
//! - [`workout`]: structured workouts (TOML or Zwift `.zwo`) converted to playlists
//! - [`generate`]: filling a workout with tempo-matched tracks from a library
//! - [`bpm`]: cadence/BPM matching
//! - [`render`], [`theme`]: CLI text output
//! - [`config`]: user configuration
//! - [`cli`]: command-line definition shared with `xtask`

pub mod bpm;
pub mod cli;
pub mod clock;
pub mod config;
pub mod generate;
pub mod playlist;
pub mod render;
pub mod theme;
pub mod timer;
pub mod workout;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use generate::{generate_playlist, GeneratedPlaylist, Track, TrackSubstitutor};
pub use playlist::{demo_playlist, Playlist, Segment};
pub use timer::{PlaybackTimer, TimerState, TimerStatus};
pub use workout::Workout;
