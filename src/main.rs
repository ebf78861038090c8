//! cadence CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cadence::cli::{Cli, Commands, ConfigCommands};

/// Environment variable holding the log filter, e.g. `CADENCE_LOG=debug`.
const LOG_ENV_VAR: &str = "CADENCE_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        let theme = cadence::theme::current_theme();
        eprintln!("{} {:#}", theme.error_text("error:"), err);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Demo { json } => commands::demo::handle(json),
        Commands::Inspect { file } => commands::inspect::handle(&file),
        Commands::Run {
            file,
            simulate,
            tick_ms,
        } => commands::run::handle(file.as_deref(), simulate, tick_ms),
        Commands::Generate {
            workout,
            library,
            json,
            output,
            swap,
        } => commands::generate::handle(&workout, &library, json, output.as_deref(), &swap),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Edit => commands::config::handle_edit(),
            ConfigCommands::Migrate { yes } => commands::config::handle_migrate(yes),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
