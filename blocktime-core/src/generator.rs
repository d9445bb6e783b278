//! Request building and response parsing for generated schedules.
//!
//! The network call itself lives with the caller; this module only turns
//! templates into a prompt and a model's free-text reply into events.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;
use serde::Deserialize;

use crate::color::Color;
use crate::error::{BlockTimeError, BlockTimeResult};
use crate::event::Event;
use crate::template::EventTemplate;
use crate::time_of_day::TimeOfDay;

pub const DEFAULT_START_HOUR: u32 = 9;
pub const DEFAULT_END_HOUR: u32 = 21;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.+?)\s*```").expect("valid regex"));

/// What to ask the generator for.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub date: NaiveDate,
    pub templates: Vec<EventTemplate>,
    pub start_hour: u32,
    pub end_hour: u32,
    pub constraints: Option<String>,
}

impl ScheduleRequest {
    pub fn new(date: NaiveDate, templates: Vec<EventTemplate>) -> Self {
        ScheduleRequest {
            date,
            templates,
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            constraints: None,
        }
    }

    pub fn validate(&self) -> BlockTimeResult<()> {
        if self.templates.is_empty() {
            return Err(BlockTimeError::Config(
                "Please create some activity blocks first.".into(),
            ));
        }
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(BlockTimeError::Config(format!(
                "Invalid hour range {}..{}",
                self.start_hour, self.end_hour
            )));
        }
        Ok(())
    }

    /// Templates as a `{"Title": minutes, ...}` object.
    fn templates_json(&self) -> String {
        let pairs: Vec<String> = self
            .templates
            .iter()
            .map(|t| format!("{}: {}", serde_json::Value::String(t.title.clone()), t.duration_minutes))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }

    pub fn prompt(&self) -> String {
        let date = self.date.format("%A, %B %-d, %Y");
        let (start, end) = (self.start_hour, self.end_hour);

        let mut prompt = format!(
            "I need you to create a daily schedule for {date} using the following activities \
             and their durations (in minutes):\n\n{}\n\n\
             Requirements:\n\
             1. Schedule activities between {start:02}:00 and {end:02}:00\n\
             2. Include appropriate breaks between activities\n\
             3. Try to create a balanced day with a good mix of activities\n\
             4. Each activity should have a specific start time and end time\n\n",
            self.templates_json()
        );

        if let Some(constraints) = self.constraints.as_deref().filter(|c| !c.trim().is_empty()) {
            prompt.push_str(&format!("Additional constraints/preferences:\n{constraints}\n\n"));
        }

        prompt.push_str(&format!(
            "Return the schedule in a JSON format that I can parse. Use this exact format:\n\n\
             ```json\n\
             [\n  {{\n    \"title\": \"Activity Name\",\n    \"startTime\": \"HH:MM\",\n    \"endTime\": \"HH:MM\"\n  }}\n]\n\
             ```\n\n\
             Please ensure there are no overlapping times, and all times are valid within the \
             {start:02}:00 to {end:02}:00 range."
        ));
        prompt
    }
}

/// One entry of the generator's JSON array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedEntry {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
}

/// Pull the JSON array out of a free-text reply: the first fenced `json`
/// block, otherwise everything from the first `[` to the last `]`.
pub fn extract_json(response: &str) -> Option<&str> {
    if let Some(captures) = FENCED_JSON.captures(response) {
        return captures.get(1).map(|m| m.as_str());
    }

    let start = response.find('[')?;
    let end = response.rfind(']')?;
    (start < end).then(|| &response[start..=end])
}

/// Parse a strict `HH:MM` clock time.
pub fn parse_time(s: &str) -> BlockTimeResult<TimeOfDay> {
    let time: TimeOfDay = s.parse()?;
    if time.is_end_of_day() {
        return Err(BlockTimeError::InvalidTime(s.to_string()));
    }
    Ok(time)
}

/// Entries from a reply. Malformed entries are skipped; a reply without a
/// parsable array is an error.
pub fn parse_entries(response: &str) -> BlockTimeResult<Vec<GeneratedEntry>> {
    let json = extract_json(response)
        .ok_or_else(|| BlockTimeError::InvalidJson("no JSON array in response".into()))?;

    let values: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| BlockTimeError::InvalidJson(e.to_string()))?;

    Ok(values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<GeneratedEntry>(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed schedule entry");
                None
            }
        })
        .collect())
}

/// Turn a reply into events on `date`, sorted by start.
///
/// Colors come from the template with the exact same title, otherwise
/// [`Color::FALLBACK`]. An end earlier than its start rolls to the next day.
pub fn parse_schedule(response: &str, templates: &[EventTemplate], date: NaiveDate) -> BlockTimeResult<Vec<Event>> {
    let mut events: Vec<Event> = parse_entries(response)?
        .into_iter()
        .filter_map(|entry| entry_to_event(entry, templates, date))
        .collect();

    events.sort_by_key(|e| e.start);
    Ok(events)
}

fn entry_to_event(entry: GeneratedEntry, templates: &[EventTemplate], date: NaiveDate) -> Option<Event> {
    let times = parse_time(&entry.start_time)
        .and_then(|start| parse_time(&entry.end_time).map(|end| (start, end)));
    let (start, end) = match times {
        Ok(times) => times,
        Err(e) => {
            tracing::warn!(title = %entry.title, error = %e, "skipping schedule entry");
            return None;
        }
    };

    let start = start.on(date);
    let mut end = end.on(date);
    if end < start {
        end += Duration::days(1);
    }

    let color = templates
        .iter()
        .find(|t| t.title == entry.title)
        .map(|t| t.color)
        .unwrap_or(Color::FALLBACK);

    Some(Event::new(entry.title, start, end, color))
}
