//! `cadence config show|edit|migrate`

use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use cadence::config::{migrate_config, MigrateResult};
use cadence::theme::{ansi, current_theme};
use cadence::Config;

/// Show current configuration as TOML.
pub fn handle_show() -> Result<()> {
    let config = Config::load()?;
    let toml_str = toml::to_string_pretty(&config)?;
    let theme = current_theme();
    println!("{}", theme.primary_text(toml_str.trim_end()));
    Ok(())
}

/// Open the configuration file in `$EDITOR` (default `vi`), creating it first
/// if needed.
#[cfg(not(tarpaulin_include))]
pub fn handle_edit() -> Result<()> {
    let config_path = Config::config_path()?;
    let theme = current_theme();

    if !config_path.exists() {
        Config::default().save()?;
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    println!(
        "{}",
        theme.primary_text(&format!(
            "Opening {} with {}",
            config_path.display(),
            editor
        ))
    );

    std::process::Command::new(&editor)
        .arg(&config_path)
        .status()
        .with_context(|| format!("Failed to open editor '{}'", editor))?;
    Ok(())
}

/// Add fields missing from the config file.
///
/// Shows the lines that would be added and asks before writing, unless `yes`
/// is set. Without a TTY and without `yes`, nothing is written.
pub fn handle_migrate(yes: bool) -> Result<()> {
    let theme = current_theme();
    let config_path = Config::config_path()?;
    let file_exists = config_path.exists();

    let content = if file_exists {
        fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?
    } else {
        String::new()
    };

    let result = migrate_config(&content)?;
    if !result.has_changes() {
        println!("{}", theme.primary_text("Config is already up to date."));
        return Ok(());
    }

    if file_exists {
        println!(
            "{}",
            theme.primary_text(&format!(
                "Found {} missing field(s) in {} new section(s):",
                result.added_fields.len(),
                result.sections_added.len()
            ))
        );
    } else {
        println!(
            "{}",
            theme.primary_text("Config file does not exist. Will create with default settings.")
        );
    }
    println!();
    print_added_lines(&result);
    println!();

    let question = if file_exists {
        format!("Apply these changes to {}?", config_path.display())
    } else {
        format!("Create {}?", config_path.display())
    };
    if !yes && !prompt_confirmation(&question)? {
        println!("{}", theme.primary_text("No changes made."));
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config_path, &result.content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("{}", theme.success_text("Config updated successfully."));
    Ok(())
}

/// Print the migrated file's added keys (and their section headers) with a
/// `+` prefix.
fn print_added_lines(result: &MigrateResult) {
    let theme = current_theme();
    let added: HashSet<&str> = result.added_fields.iter().map(String::as_str).collect();
    let plus = if theme.enabled {
        format!("{}+{}", ansi::GREEN, ansi::RESET)
    } else {
        "+".to_string()
    };

    let mut section = String::new();
    let mut header_printed = false;
    for line in result.content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            section = trimmed[1..trimmed.len() - 1].to_string();
            header_printed = false;
            continue;
        }
        let Some((key, _)) = trimmed.split_once('=') else {
            continue;
        };
        let field = format!("{}.{}", section, key.trim());
        if !added.contains(field.as_str()) {
            continue;
        }
        if !header_printed {
            let marker = if result.sections_added.contains(&section) {
                plus.as_str()
            } else {
                " "
            };
            println!("{} [{}]", marker, section);
            header_printed = true;
        }
        println!("{} {}", plus, theme.success_text(line));
    }
}

/// Ask a yes/no question on stdin. Non-interactive sessions answer no.
fn prompt_confirmation(message: &str) -> Result<bool> {
    let theme = current_theme();

    if !atty::is(atty::Stream::Stdin) {
        println!(
            "{}",
            theme.secondary_text("Non-interactive mode: use --yes to apply changes automatically")
        );
        return Ok(false);
    }

    print!("{} [y/N] ", theme.primary_text(message));
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
