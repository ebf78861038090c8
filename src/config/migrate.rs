//! Config migration: add fields introduced since the file was written.
//!
//! Existing values, comments and ordering are preserved; only missing
//! sections and keys are appended, taken from [`Config::default`].

use anyhow::{Context, Result};
use toml_edit::{DocumentMut, Item};

use super::Config;

/// Outcome of [`migrate_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateResult {
    /// Full file content after migration
    pub content: String,
    /// Added keys as `section.key`
    pub added_fields: Vec<String>,
    /// Sections that did not exist at all
    pub sections_added: Vec<String>,
}

impl MigrateResult {
    pub fn has_changes(&self) -> bool {
        !self.added_fields.is_empty()
    }
}

/// Merge missing default fields into `content`.
pub fn migrate_config(content: &str) -> Result<MigrateResult> {
    let mut doc: DocumentMut = content.parse().context("Existing config is not valid TOML")?;
    let defaults: DocumentMut = toml::to_string_pretty(&Config::default())?
        .parse()
        .context("Failed to render default config")?;

    let mut added_fields = Vec::new();
    let mut sections_added = Vec::new();

    for (section, default_item) in defaults.iter() {
        let Some(default_table) = default_item.as_table() else {
            continue;
        };

        if !doc.contains_key(section) {
            doc.insert(section, Item::Table(default_table.clone()));
            sections_added.push(section.to_string());
            added_fields.extend(default_table.iter().map(|(key, _)| format!("{}.{}", section, key)));
            continue;
        }

        // A section overwritten with a non-table value is left for the user to fix
        let Some(existing) = doc.get_mut(section).and_then(Item::as_table_like_mut) else {
            continue;
        };

        for (key, value) in default_table.iter() {
            if !existing.contains_key(key) {
                existing.insert(key, value.clone());
                added_fields.push(format!("{}.{}", section, key));
            }
        }
    }

    Ok(MigrateResult {
        content: doc.to_string(),
        added_fields,
        sections_added,
    })
}
