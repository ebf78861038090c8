//! Command-line interface definition.
//!
//! Lives in the library so `xtask` can render the man page from the same
//! definition the binary parses.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Version string: crate version plus build metadata from `build.rs`.
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    " ",
    env!("CADENCE_BUILD_DATE"),
    ")"
);

#[cfg(feature = "release")]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CADENCE_BUILD_DATE"),
    ")"
);

/// Longest accepted poll interval, one day in milliseconds.
pub const MAX_TICK_MS: u64 = 86_400_000;

/// Cadence - follow a workout playlist segment by segment
#[derive(Debug, Parser)]
#[command(name = "cadence", version = VERSION, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the built-in demo playlist
    Demo {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the segments of a playlist (.json) or workout (.toml, .zwo) file
    Inspect {
        /// Playlist or workout file
        file: PathBuf,
    },

    /// Run the timer over a playlist, printing segment changes
    Run {
        /// Playlist or workout file (defaults to the demo playlist)
        file: Option<PathBuf>,

        /// Advance a simulated clock one tick per poll instead of sleeping
        #[arg(long)]
        simulate: bool,

        /// Poll interval in milliseconds (overrides config)
        #[arg(
            long,
            value_name = "MS",
            value_parser = clap::value_parser!(u64).range(1..=MAX_TICK_MS)
        )]
        tick_ms: Option<u64>,
    },

    /// Build a playlist for a workout from a BPM-tagged track library
    Generate {
        /// Workout file (.toml or .zwo)
        workout: PathBuf,

        /// Track library (JSON array of tracks with `bpm`)
        library: PathBuf,

        /// Print the playlist as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Write the playlist JSON to this file (usable with `run`)
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Replace the Nth track with the next best match (repeatable)
        #[arg(long, value_name = "N")]
        swap: Vec<usize>,
    },

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration as TOML
    Show,
    /// Open the configuration file in $EDITOR
    Edit,
    /// Add fields missing from an older configuration file
    Migrate {
        /// Apply without asking for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}
