use anyhow::{Context, Result};
use blocktime_core::color::Color;
use blocktime_core::config::BlockTimeConfig;
use blocktime_core::session::DEFAULT_EVENT_TITLE;
use blocktime_core::time_of_day::{TimeOfDay, TimeSpan};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::render::render_event;

const DEFAULT_DURATION_MINUTES: u32 = 60;

pub fn run(
    config: &BlockTimeConfig,
    day: NaiveDate,
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    duration: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let title = title.unwrap_or_else(|| DEFAULT_EVENT_TITLE.to_string());
    let start = super::parse_time(start.as_deref().context("--start is required")?)?;
    let end = resolve_end(start, end.as_deref(), duration.as_deref())?;
    let color = super::parse_color(color.as_deref())?.unwrap_or(Color::FALLBACK);

    let mut session = super::open_session(config, day)?;
    let id = session.create_event(&title, TimeSpan::new(start, end), color)?;

    if let Some(event) = session.event(&id) {
        println!("{}", "Created:".green());
        println!("{}", render_event(event, day));
    }
    Ok(())
}

/// Tap on an empty spot of the timeline.
pub fn tap(config: &BlockTimeConfig, day: NaiveDate, title: Option<String>, y: f64) -> Result<()> {
    let mut session = super::open_session(config, day)?;
    let id = session.add_default_event(y)?;

    if let Some(title) = title {
        if let Some(mut event) = session.event(&id).cloned() {
            event.title = title;
            session.edit_event(event)?;
        }
    }

    if let Some(event) = session.event(&id) {
        println!("{}", "Created:".green());
        println!("{}", render_event(event, day));
    }
    Ok(())
}

/// End from `--end`, else `--duration`, else one hour after `start`.
fn resolve_end(start: TimeOfDay, end: Option<&str>, duration: Option<&str>) -> Result<TimeOfDay> {
    if let Some(end) = end {
        return super::parse_time(end);
    }

    let minutes = match duration {
        Some(d) => super::parse_duration_minutes(d)?,
        None => DEFAULT_DURATION_MINUTES,
    };
    Ok(start.saturating_add_minutes(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> TimeOfDay {
        TimeOfDay::new(h, m).unwrap()
    }

    #[test]
    fn end_defaults_to_one_hour() {
        assert_eq!(resolve_end(t(9, 0), None, None).unwrap(), t(10, 0));
    }

    #[test]
    fn end_from_duration_saturates() {
        assert_eq!(resolve_end(t(9, 0), None, Some("45m")).unwrap(), t(9, 45));
        assert_eq!(
            resolve_end(t(23, 30), None, Some("2h")).unwrap(),
            TimeOfDay::END_OF_DAY
        );
    }

    #[test]
    fn explicit_end_wins() {
        assert_eq!(resolve_end(t(9, 0), Some("24:00"), None).unwrap(), TimeOfDay::END_OF_DAY);
        assert!(resolve_end(t(9, 0), Some("9am"), None).is_err());
    }
}
