use anyhow::Result;
use blocktime_core::config::BlockTimeConfig;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::render::render_event;

pub fn run(
    config: &BlockTimeConfig,
    day: NaiveDate,
    id: &str,
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let mut session = super::open_session(config, day)?;
    let id = super::resolve_event_id(&session, id)?;
    let Some(mut event) = session.event(&id).cloned() else {
        anyhow::bail!("Event disappeared while editing");
    };

    if title.is_none() && start.is_none() && end.is_none() && color.is_none() {
        println!("{}", "Nothing to change".dimmed());
        return Ok(());
    }

    if let Some(title) = title {
        event.title = title;
    }
    if let Some(start) = start {
        event.start = super::parse_time(&start)?.on(day);
    }
    if let Some(end) = end {
        event.end = super::parse_time(&end)?.on(day);
    }
    if let Some(color) = super::parse_color(color.as_deref())? {
        event.color = color;
    }

    session.edit_event(event)?;

    if let Some(event) = session.event(&id) {
        println!("{}", "Updated:".yellow());
        println!("{}", render_event(event, day));
    }
    Ok(())
}
