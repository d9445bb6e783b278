pub mod add;
pub mod delete;
pub mod drag;
pub mod edit;
pub mod export;
pub mod generate;
pub mod place;
pub mod show;
pub mod templates;

use anyhow::{Context, Result};
use blocktime_core::color::Color;
use blocktime_core::config::BlockTimeConfig;
use blocktime_core::event::{Event, EventId};
use blocktime_core::session::DaySession;
use blocktime_core::store::FileStore;
use blocktime_core::template::TemplateCatalog;
use blocktime_core::time_of_day::TimeOfDay;
use chrono::{Duration, NaiveDate};

/// Open the session for `day` against the configured data directory.
pub fn open_session(config: &BlockTimeConfig, day: NaiveDate) -> Result<DaySession<FileStore>> {
    let placement = config.timeline.placement()?;
    let store = FileStore::new(config.data_path());
    Ok(DaySession::open(day, store, placement)?)
}

pub fn open_catalog(config: &BlockTimeConfig) -> Result<(TemplateCatalog, FileStore)> {
    let mut store = FileStore::new(config.data_path());
    let catalog = TemplateCatalog::load_or_seed(&mut store)?;
    Ok((catalog, store))
}

/// Find the event whose id starts with `prefix`. Ambiguous prefixes are an
/// error.
pub fn resolve_event<'a>(events: &[&'a Event], prefix: &str) -> Result<&'a Event> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        anyhow::bail!("Event id cannot be empty");
    }

    let matches: Vec<&Event> = events
        .iter()
        .copied()
        .filter(|e| e.id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [event] => Ok(*event),
        [] => anyhow::bail!("No event matching '{}' on this day", prefix),
        many => anyhow::bail!(
            "'{}' matches {} events. Use a longer id.",
            prefix,
            many.len()
        ),
    }
}

pub fn resolve_event_id(session: &DaySession<FileStore>, prefix: &str) -> Result<EventId> {
    Ok(resolve_event(&session.model().all(), prefix)?.id)
}

/// Parse `--date`, relative to `today`.
pub fn parse_day(input: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let Some(input) = input else {
        return Ok(today);
    };

    match input.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        "yesterday" => Ok(today - Duration::days(1)),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .with_context(|| format!("Could not parse date: \"{}\" (expected YYYY-MM-DD)", input)),
    }
}

pub fn parse_time(input: &str) -> Result<TimeOfDay> {
    input
        .parse::<TimeOfDay>()
        .with_context(|| format!("Could not parse time: \"{}\" (expected HH:MM)", input))
}

/// Parse a duration string into whole minutes.
pub fn parse_duration_minutes(input: &str) -> Result<u32> {
    let duration = humantime::parse_duration(input)
        .map_err(|e| anyhow::anyhow!("Could not parse duration: \"{}\" ({})", input, e))?;

    let minutes = duration.as_secs() / 60;
    if minutes == 0 {
        anyhow::bail!("Duration must be at least one minute");
    }
    u32::try_from(minutes).context("Duration too large")
}

pub fn parse_color(input: Option<&str>) -> Result<Option<Color>> {
    input.map(|s| Color::parse_rgba(s).map_err(Into::into)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocktime_core::time_of_day::TimeSpan;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    #[test]
    fn parse_day_keywords() {
        assert_eq!(parse_day(None, today()).unwrap(), today());
        assert_eq!(parse_day(Some("Tomorrow"), today()).unwrap(), today().succ_opt().unwrap());
        assert_eq!(parse_day(Some("yesterday"), today()).unwrap(), today().pred_opt().unwrap());
    }

    #[test]
    fn parse_day_absolute() {
        assert_eq!(
            parse_day(Some("2025-12-01"), today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
        assert!(parse_day(Some("12/01/2025"), today()).is_err());
    }

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration_minutes("50m").unwrap(), 50);
        assert_eq!(parse_duration_minutes("2h").unwrap(), 120);
        assert_eq!(parse_duration_minutes("1h 30m").unwrap(), 90);
        assert!(parse_duration_minutes("30s").is_err());
        assert!(parse_duration_minutes("soon").is_err());
    }

    #[test]
    fn parse_color_optional() {
        assert_eq!(parse_color(None).unwrap(), None);
        assert_eq!(
            parse_color(Some("1,0,0,1")).unwrap(),
            Some(Color::rgba(1.0, 0.0, 0.0, 1.0))
        );
        assert!(parse_color(Some("red")).is_err());
    }

    #[test]
    fn resolve_event_by_prefix() {
        let span = TimeSpan::new(TimeOfDay::new(9, 0).unwrap(), TimeOfDay::new(10, 0).unwrap());
        let a = Event::on_day("A", today(), span, Color::FALLBACK);
        let b = Event::on_day("B", today(), span, Color::FALLBACK);
        let events = vec![&a, &b];

        let full = a.id.to_string();
        assert_eq!(resolve_event(&events, &full).unwrap().id, a.id);
        assert_eq!(resolve_event(&events, &full.to_uppercase()).unwrap().id, a.id);
        assert!(resolve_event(&events, "").is_err());
        assert!(resolve_event(&events, "zzzz").is_err());
    }
}
