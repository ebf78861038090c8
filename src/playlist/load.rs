//! Reading playlists from disk.
//!
//! Formats are picked by file extension:
//! - `.json`: a plain array of segments
//! - `.toml`: a workout definition, converted with [`Workout::to_playlist`]
//! - `.zwo`: a Zwift workout, converted the same way

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Playlist;
use crate::workout::{Workout, ZwoError};

/// Errors that can occur while loading a playlist file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Invalid playlist JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid workout definition: {0}")]
    InvalidWorkout(#[from] toml::de::Error),

    #[error("Invalid Zwift workout: {0}")]
    InvalidZwo(#[from] ZwoError),

    #[error("Unsupported playlist format '{extension}' (expected .json, .toml or .zwo)")]
    UnsupportedFormat { extension: String },
}

/// Load a playlist from a `.json` segment list or a `.toml`/`.zwo` workout.
pub fn load_playlist(path: impl AsRef<Path>) -> Result<Playlist, LoadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let content = fs::read_to_string(path)?;
    let playlist = match extension.as_str() {
        "json" => parse_playlist_json(&content)?,
        "toml" => Workout::from_toml_str(&content)?.to_playlist(),
        "zwo" => Workout::from_zwo_str(&content)?.to_playlist(),
        _ => return Err(LoadError::UnsupportedFormat { extension }),
    };

    debug!(
        path = %path.display(),
        segments = playlist.len(),
        "loaded playlist"
    );
    Ok(playlist)
}

/// Parse a JSON array of segments.
pub fn parse_playlist_json(content: &str) -> Result<Playlist, LoadError> {
    Ok(serde_json::from_str(content)?)
}
