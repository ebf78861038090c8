//! `cadence demo`

use anyhow::Result;

use cadence::playlist::demo_playlist;
use cadence::render::segment_table;
use cadence::theme::current_theme;
use cadence::Config;

/// Print the demo playlist as a table, or as JSON usable with `run`/`inspect`.
pub fn handle(json: bool) -> Result<()> {
    let playlist = demo_playlist();

    if json {
        println!("{}", serde_json::to_string_pretty(&playlist)?);
        return Ok(());
    }

    let config = Config::load()?;
    let theme = current_theme();
    println!("{}", theme.primary_text(&segment_table(&playlist, &config.bpm)));
    Ok(())
}
