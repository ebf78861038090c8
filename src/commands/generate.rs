//! `cadence generate <WORKOUT> <LIBRARY>`

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use cadence::generate::{generate_playlist, load_library, TrackSubstitutor};
use cadence::render::{format_duration, segment_table};
use cadence::theme::current_theme;
use cadence::{Config, Workout};

/// Fill a workout with tracks from a library and print or save the result.
///
/// `swaps` are 1-based track positions to replace with the next best match,
/// applied in order.
pub fn handle(
    workout_path: &Path,
    library_path: &Path,
    json: bool,
    output: Option<&Path>,
    swaps: &[usize],
) -> Result<()> {
    let config = Config::load()?;
    let theme = current_theme();

    let workout = Workout::load(workout_path)?;
    let tracks = load_library(library_path)
        .with_context(|| format!("Cannot read track library {}", library_path.display()))?;

    let mut generated = generate_playlist(&workout, &tracks);

    let mut substitutor = TrackSubstitutor::new(&tracks);
    let mut swap_lines = Vec::with_capacity(swaps.len());
    for &position in swaps {
        let before = position
            .checked_sub(1)
            .and_then(|index| generated.selections.get(index))
            .map(|s| s.track.display_name());
        let Some(before) = before else {
            bail!(
                "No track #{} to swap (playlist has {})",
                position,
                generated.selections.len()
            );
        };
        let Some(after) = generated.swap(position - 1, &mut substitutor) else {
            bail!("Track library is empty, nothing to swap in");
        };
        swap_lines.push(format!(
            "Swapped #{}: {} -> {}",
            position,
            before,
            after.track.display_name()
        ));
    }

    let playlist = generated.to_playlist();
    let playlist_json = serde_json::to_string_pretty(&playlist)?;

    if let Some(path) = output {
        fs::write(path, &playlist_json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    if json {
        println!("{}", playlist_json);
        return Ok(());
    }

    let title = if workout.name.is_empty() {
        "Workout"
    } else {
        workout.name.as_str()
    };
    println!(
        "{}",
        theme.accent_text(&format!(
            "{}: {} track(s) from {} in library ({})",
            title,
            playlist.len(),
            tracks.len(),
            format_duration(generated.total_duration_secs as i64 * 1000)
        ))
    );
    for line in &swap_lines {
        println!("{}", theme.secondary_text(line));
    }
    println!();
    println!("{}", theme.primary_text(&segment_table(&playlist, &config.bpm)));

    if let Some(path) = output {
        println!();
        println!(
            "{}",
            theme.success_text(&format!("Wrote {}", path.display()))
        );
    }
    Ok(())
}
