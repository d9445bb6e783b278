use anyhow::Result;
use blocktime_core::config::BlockTimeConfig;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::render::render_event;

pub fn run(config: &BlockTimeConfig, day: NaiveDate, id: &str) -> Result<()> {
    let mut session = super::open_session(config, day)?;
    let id = super::resolve_event_id(&session, id)?;

    match session.delete_event(&id)? {
        Some(event) => {
            println!("{}", "Deleted:".red());
            println!("{}", render_event(&event, day));
        }
        None => println!("{}", "Nothing to delete".dimmed()),
    }
    Ok(())
}
