//! Text rendering for the CLI.
//!
//! Durations, progress bars with segment boundary markers, status lines and
//! playlist tables. Everything returns plain strings so callers decide where
//! the output goes.

use unicode_width::UnicodeWidthStr;

use crate::bpm::BpmMatchingConfig;
use crate::clock::Clock;
use crate::playlist::Playlist;
use crate::timer::{PlaybackTimer, TimerStatus};

/// Format milliseconds as MM:SS. Negative values render as 00:00.
pub fn format_duration(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    let mins = total_secs / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Build the progress bar character array.
///
/// # Arguments
/// * `bar_width` - Width of the bar in characters
/// * `elapsed_ms` - Current position on the workout clock
/// * `total_ms` - Total workout duration
/// * `boundaries` - Segment start offsets to mark on the bar
///
/// # Returns
/// A tuple of (bar_chars, filled_count) where bar_chars contains the visual
/// representation and filled_count is the number of filled positions.
pub fn build_progress_bar_chars(
    bar_width: usize,
    elapsed_ms: i64,
    total_ms: i64,
    boundaries: &[i64],
) -> (Vec<char>, usize) {
    let progress = if total_ms > 0 {
        (elapsed_ms as f64 / total_ms as f64).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let filled = (bar_width as f64 * progress) as usize;

    let mut bar: Vec<char> = (0..bar_width)
        .map(|i| if i < filled { '━' } else { '─' })
        .collect();

    if filled < bar_width {
        bar[filled] = '⏺';
    }

    for &boundary in boundaries {
        if boundary <= 0 || total_ms <= 0 {
            continue;
        }
        let pos = ((boundary as f64 / total_ms as f64) * bar_width as f64) as usize;
        if pos < bar_width && bar[pos] != '⏺' {
            bar[pos] = '◆';
        }
    }

    (bar, filled)
}

/// Progress bar for a timer, with a marker at every segment start.
pub fn progress_bar<C: Clock>(timer: &PlaybackTimer<C>, bar_width: usize) -> String {
    let boundaries: Vec<i64> = timer.playlist().iter().map(|s| s.start_ms).collect();
    let (bar, _) = build_progress_bar_chars(
        bar_width,
        timer.elapsed_ms(),
        timer.total_duration_ms(),
        &boundaries,
    );
    bar.into_iter().collect()
}

fn status_icon(status: TimerStatus) -> &'static str {
    match status {
        TimerStatus::Idle => "·",
        TimerStatus::Running => "▶",
        TimerStatus::Paused => "⏸",
        TimerStatus::Finished => "■",
    }
}

/// One-line summary: state, clock, current segment and time left in it.
pub fn status_line<C: Clock>(timer: &PlaybackTimer<C>) -> String {
    let label = timer
        .current_segment()
        .map(|s| s.label.as_str())
        .unwrap_or("-");
    format!(
        "{} {}/{}  {}  ({}s left)",
        status_icon(timer.status()),
        format_duration(timer.elapsed_ms()),
        format_duration(timer.total_duration_ms()),
        label,
        timer.remaining_in_current_segment_secs()
    )
}

fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

fn optional(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Aligned table of segments with cadence/BPM match column and a total line.
pub fn segment_table(playlist: &Playlist, bpm: &BpmMatchingConfig) -> String {
    let label_width = playlist
        .iter()
        .map(|s| s.label.width())
        .max()
        .unwrap_or(0)
        .max("LABEL".len());

    let mut lines = Vec::with_capacity(playlist.len() + 2);
    lines.push(format!(
        "{:<3}{:<13}{}  {:>7}  {:>3}  {}",
        "#",
        "RANGE",
        pad_to_width("LABEL", label_width),
        "CADENCE",
        "BPM",
        "MATCH"
    ));

    for (i, segment) in playlist.iter().enumerate() {
        let range = format!(
            "{}-{}",
            format_duration(segment.start_ms),
            format_duration(segment.end_ms)
        );
        let matched = match segment.cadence_match(bpm) {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        lines.push(format!(
            "{:<3}{:<13}{}  {:>7}  {:>3}  {}",
            i + 1,
            range,
            pad_to_width(&segment.label, label_width),
            optional(segment.target_cadence),
            optional(segment.bpm),
            matched
        ));
    }

    let noun = if playlist.len() == 1 { "segment" } else { "segments" };
    lines.push(format!(
        "Total: {} ({} {})",
        format_duration(playlist.total_duration_ms()),
        playlist.len(),
        noun
    ));

    lines.join("\n")
}
