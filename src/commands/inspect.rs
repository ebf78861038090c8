//! `cadence inspect <FILE>`

use std::path::Path;

use anyhow::{Context, Result};

use cadence::playlist::load_playlist;
use cadence::render::segment_table;
use cadence::theme::current_theme;
use cadence::{Config, Workout};

fn is_workout(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml") || e.eq_ignore_ascii_case("zwo"))
}

/// Print the segment table for a playlist or workout (.toml/.zwo) file.
pub fn handle(file: &Path) -> Result<()> {
    let config = Config::load()?;
    let theme = current_theme();

    if is_workout(file) {
        let workout = Workout::load(file)?;
        if !workout.name.is_empty() {
            println!("{}", theme.accent_text(&workout.name));
        }
        if !workout.author.is_empty() {
            println!("{}", theme.secondary_text(&format!("by {}", workout.author)));
        }
        if !workout.description.is_empty() {
            println!("{}", theme.secondary_text(&workout.description));
        }
        println!();
    }

    let playlist =
        load_playlist(file).with_context(|| format!("Cannot inspect {}", file.display()))?;
    println!("{}", theme.primary_text(&segment_table(&playlist, &config.bpm)));
    Ok(())
}
