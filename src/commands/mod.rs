//! Subcommand handlers for the cadence binary

pub mod completions;
pub mod config;
pub mod demo;
pub mod generate;
pub mod inspect;
pub mod run;
