//! Colored terminal rendering for blocktime types.

use blocktime_core::color::Color;
use blocktime_core::event::Event;
use blocktime_core::placement::Rect;
use blocktime_core::template::EventTemplate;
use blocktime_core::time_of_day::TimeOfDay;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

/// Number of id characters shown; enough to pass back as a prefix.
const SHORT_ID_LEN: usize = 8;

pub trait Render {
    fn render(&self) -> String;
}

fn swatch(color: &Color) -> String {
    let [r, g, b] = [color.red, color.green, color.blue].map(|c| (c * 255.0).round() as u8);
    "■".truecolor(r, g, b).to_string()
}

pub fn short_id(event: &Event) -> String {
    event.id.to_string().chars().take(SHORT_ID_LEN).collect()
}

impl Render for EventTemplate {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            swatch(&self.color),
            self.title,
            format_minutes(self.duration_minutes).dimmed()
        )
    }
}

/// `HH:MM-HH:MM` for an event seen from `day`; an end on the next midnight
/// shows as 24:00.
pub fn render_time_range(event: &Event, day: NaiveDate) -> String {
    let start = TimeOfDay::within_day(event.start, day);
    let end = TimeOfDay::within_day(event.end, day);
    format!("{}-{}", start, end)
}

pub fn render_event(event: &Event, day: NaiveDate) -> String {
    format!(
        "  {} {} {} {}",
        swatch(&event.color),
        render_time_range(event, day),
        event.title,
        format!("[{}]", short_id(event)).dimmed()
    )
}

pub fn render_rect(rect: &Rect) -> String {
    format!("y={:.1} h={:.1}", rect.y, rect.height)
        .dimmed()
        .to_string()
}

pub fn render_day_header(day: NaiveDate) -> String {
    day.format("%A, %B %-d, %Y").to_string().bold().to_string()
}

/// `50m`, `2h`, `1h 30m`
pub fn format_minutes(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocktime_core::time_of_day::TimeSpan;

    #[test]
    fn minutes_format() {
        assert_eq!(format_minutes(50), "50m");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(90), "1h 30m");
    }

    #[test]
    fn time_range_shows_end_of_day() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        let span = TimeSpan::new(TimeOfDay::new(22, 0).unwrap(), TimeOfDay::END_OF_DAY);
        let event = Event::on_day("Wind down", day, span, Color::FALLBACK);

        assert_eq!(render_time_range(&event, day), "22:00-24:00");
    }
}
