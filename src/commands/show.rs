use anyhow::Result;
use blocktime_core::config::BlockTimeConfig;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::render::{render_day_header, render_event, render_rect};

pub fn run(config: &BlockTimeConfig, day: NaiveDate, layout: bool) -> Result<()> {
    let session = super::open_session(config, day)?;

    println!("{}", render_day_header(day));

    let events = session.layout();
    if events.is_empty() {
        println!("{}", "  No events".dimmed());
        return Ok(());
    }

    for (event, rect) in events {
        if layout {
            println!("{} {}", render_event(event, day), render_rect(&rect));
        } else {
            println!("{}", render_event(event, day));
        }
    }

    Ok(())
}
