use std::path::PathBuf;

use anyhow::Result;
use blocktime_core::config::BlockTimeConfig;
use blocktime_core::export::{IcsDirectorySink, export_events};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::render::pluralize;

const SERVICE: &str = "ICS";

pub fn run(config: &BlockTimeConfig, day: NaiveDate, dir: Option<PathBuf>) -> Result<()> {
    let session = super::open_session(config, day)?;
    let events = session.events();

    if events.is_empty() {
        println!("{}", "No events to export".dimmed());
        return Ok(());
    }

    let dir = dir.unwrap_or_else(|| config.export_path());
    let mut sink = IcsDirectorySink::new(dir);
    let summary = export_events(&events, day, &mut sink);

    let message = summary.message(SERVICE);
    if summary.failed == 0 {
        println!("{}", message.green());
    } else {
        println!("{}", message.red());
    }

    if summary.succeeded > 0 {
        println!(
            "{}",
            format!(
                "  {} {} in {}",
                summary.succeeded,
                pluralize("file", summary.succeeded),
                sink.dir().display()
            )
            .dimmed()
        );
    }
    Ok(())
}
