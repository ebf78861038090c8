//! `cadence run [FILE]`
//!
//! Drives a [`PlaybackTimer`] from a fixed-interval poll loop and prints each
//! segment change. With `--simulate` the clock is advanced by one tick per
//! poll and nothing sleeps, which makes the output deterministic.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use terminal_size::{terminal_size, Width};
use tracing::debug;

use cadence::cli::MAX_TICK_MS;
use cadence::playlist::{demo_playlist, load_playlist, Playlist, Segment};
use cadence::render::{format_duration, progress_bar, status_line};
use cadence::theme::{current_theme, Theme};
use cadence::{Clock, Config, ManualClock, PlaybackTimer};

/// Columns reserved next to the progress bar for the status text.
const STATUS_COLUMNS: usize = 60;

/// How a run ended.
enum Outcome {
    Completed,
    Interrupted,
}

pub fn handle(file: Option<&Path>, simulate: bool, tick_ms: Option<u64>) -> Result<()> {
    let config = Config::load()?;
    let theme = current_theme();

    let playlist = match file {
        Some(path) => {
            load_playlist(path).with_context(|| format!("Cannot run {}", path.display()))?
        }
        None => demo_playlist(),
    };

    if playlist.is_empty() {
        println!("{}", theme.secondary_text("Playlist is empty, nothing to run."));
        return Ok(());
    }

    let tick_ms = tick_ms
        .unwrap_or(config.timer.tick_ms)
        .clamp(1, MAX_TICK_MS);
    println!(
        "{}",
        theme.primary_text(&format!(
            "Running {} segment(s) ({})",
            playlist.len(),
            format_duration(playlist.total_duration_ms())
        ))
    );

    if simulate {
        let step = i64::try_from(tick_ms).context("Poll interval out of range")?;
        let clock = ManualClock::new(0);
        let mut timer = PlaybackTimer::with_clock(clock.clone());
        let mut runner = Runner::new(&theme, false);
        runner.drive(&mut timer, playlist, || clock.advance(step), || false)?;
        return Ok(());
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("Failed to install Ctrl-C handler")?;
    }

    let show_progress = config.timer.show_progress && atty::is(atty::Stream::Stdout);
    let mut timer = PlaybackTimer::new();
    let mut runner = Runner::new(&theme, show_progress);
    runner.drive(
        &mut timer,
        playlist,
        || thread::sleep(Duration::from_millis(tick_ms)),
        || interrupted.load(Ordering::SeqCst),
    )?;
    Ok(())
}

struct Runner<'a> {
    theme: &'a Theme,
    show_progress: bool,
    /// A progress line is on screen and must be cleared before printing
    progress_visible: bool,
}

impl<'a> Runner<'a> {
    fn new(theme: &'a Theme, show_progress: bool) -> Self {
        Self {
            theme,
            show_progress,
            progress_visible: false,
        }
    }

    fn drive<C: Clock>(
        &mut self,
        timer: &mut PlaybackTimer<C>,
        playlist: Playlist,
        mut wait: impl FnMut(),
        interrupted: impl Fn() -> bool,
    ) -> Result<Outcome> {
        timer.load(playlist);
        timer.start();

        if let Some(first) = timer.current_segment().cloned() {
            self.print_segment(timer.elapsed_ms(), &first)?;
        }

        let outcome = loop {
            if interrupted() {
                break Outcome::Interrupted;
            }

            if let Some(segment) = timer.poll_for_segment_change().cloned() {
                self.print_segment(timer.elapsed_ms(), &segment)?;
            }

            if !timer.is_running() {
                break Outcome::Completed;
            }

            if self.show_progress {
                self.print_progress(timer)?;
            }
            wait();
        };

        self.clear_progress()?;
        match outcome {
            Outcome::Completed => {
                println!(
                    "{}",
                    self.theme.success_text(&format!(
                        "Workout complete ({})",
                        format_duration(timer.elapsed_ms())
                    ))
                );
            }
            Outcome::Interrupted => {
                let elapsed = timer.elapsed_ms();
                timer.stop();
                println!(
                    "{}",
                    self.theme
                        .secondary_text(&format!("Stopped at {}", format_duration(elapsed)))
                );
            }
        }
        debug!(status = ?timer.status(), "run finished");
        Ok(outcome)
    }

    fn print_segment(&mut self, elapsed_ms: i64, segment: &Segment) -> Result<()> {
        self.clear_progress()?;
        println!(
            "{} {}",
            self.theme
                .secondary_text(&format!("[{}]", format_duration(elapsed_ms))),
            self.theme.accent_text(&segment.to_string())
        );
        Ok(())
    }

    fn print_progress<C: Clock>(&mut self, timer: &PlaybackTimer<C>) -> Result<()> {
        let width = terminal_size()
            .map(|(Width(w), _)| w as usize)
            .unwrap_or(80);
        let bar_width = width.saturating_sub(STATUS_COLUMNS).max(10);

        let mut stdout = io::stdout();
        write!(
            stdout,
            "\r\x1b[2K{} {}",
            self.theme.accent_text(&progress_bar(timer, bar_width)),
            self.theme.primary_text(&status_line(timer))
        )?;
        stdout.flush()?;
        self.progress_visible = true;
        Ok(())
    }

    fn clear_progress(&mut self) -> Result<()> {
        if self.progress_visible {
            let mut stdout = io::stdout();
            write!(stdout, "\r\x1b[2K")?;
            stdout.flush()?;
            self.progress_visible = false;
        }
        Ok(())
    }
}
