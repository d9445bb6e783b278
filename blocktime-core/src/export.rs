//! Exporting a day's events to external calendars.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use icalendar::{Calendar, Component, EventLike};

use crate::error::{BlockTimeError, BlockTimeResult};
use crate::event::Event;

/// An event ready to hand to an external calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedEvent {
    pub uid: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub notes: String,
    pub color: String,
}

impl ExportedEvent {
    pub fn new(event: &Event, day: NaiveDate) -> Self {
        let (start, end) = export_span(event, day);
        ExportedEvent {
            uid: format!("{}@blocktime", event.id),
            title: event.title.clone(),
            start,
            end,
            notes: format!("Exported from Block Time for {}", day.format("%A, %B %-d, %Y")),
            color: event.color.to_rgba_string(),
        }
    }
}

/// Anything that can receive exported events one at a time.
pub trait CalendarSink {
    fn write(&mut self, event: &ExportedEvent) -> BlockTimeResult<()>;
}

/// Start and end of `event` placed on `day`.
///
/// Only the time of day of each is kept. If the end's time of day is earlier
/// than the start's, the event crosses midnight and the end moves to the
/// next day.
pub fn export_span(event: &Event, day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = day.and_time(event.start.time());
    let mut end = day.and_time(event.end.time());
    if end < start {
        end += Duration::days(1);
    }
    (start, end)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl ExportSummary {
    pub fn message(&self, service: &str) -> String {
        match (self.succeeded, self.failed) {
            (0, failed) => format!("Failed to export {failed} events to {service}."),
            (succeeded, 0) => format!("Successfully exported {succeeded} events to {service}."),
            (succeeded, failed) => format!(
                "Successfully exported {succeeded} events to {service}. Failed to export {failed} events."
            ),
        }
    }
}

/// Write every event to `sink`, counting successes and failures. A failing
/// event does not stop the rest.
pub fn export_events<K: CalendarSink>(events: &[Event], day: NaiveDate, sink: &mut K) -> ExportSummary {
    let mut summary = ExportSummary::default();

    for event in events {
        match sink.write(&ExportedEvent::new(event, day)) {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                tracing::warn!(title = %event.title, error = %e, "failed to export event");
                summary.failed += 1;
            }
        }
    }

    summary
}

/// Generate .ics content for one exported event. Times are floating local
/// times, as the timeline has no notion of time zones.
pub fn generate_ics(event: &ExportedEvent) -> String {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.title);
    ics_event.description(&event.notes);
    ics_event.add_property("DTSTART", event.start.format("%Y%m%dT%H%M%S").to_string());
    ics_event.add_property("DTEND", event.end.format("%Y%m%dT%H%M%S").to_string());
    ics_event.add_property("X-BLOCKTIME-COLOR", &event.color);

    cal.push(ics_event.done());
    strip_ics_bloat(&cal.done().to_string())
}

/// Replace the crate's PRODID and drop the default CALSCALE.
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:BLOCKTIME\r\n");
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }
        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// Writes one .ics file per event into a directory.
#[derive(Debug, Clone)]
pub struct IcsDirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl IcsDirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        IcsDirectorySink {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// `YYYY-MM-DDTHHMM__slug`, with a numeric suffix on collision.
    fn unique_path_for(&self, event: &ExportedEvent) -> BlockTimeResult<PathBuf> {
        let base = format!("{}__{}", event.start.format("%Y-%m-%dT%H%M"), slug::slugify(&event.title));

        let candidate = self.dir.join(format!("{base}.ics"));
        if !candidate.exists() {
            return Ok(candidate);
        }

        for n in 2..=100 {
            let candidate = self.dir.join(format!("{base}-{n}.ics"));
            if !candidate.exists() {
                return Ok(candidate);
            }
        }

        Err(BlockTimeError::Export(format!("Too many file name collisions for '{base}'")))
    }
}

impl CalendarSink for IcsDirectorySink {
    fn write(&mut self, event: &ExportedEvent) -> BlockTimeResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.unique_path_for(event)?;
        std::fs::write(&path, generate_ics(event))?;

        tracing::debug!(path = %path.display(), "exported event");
        self.written.push(path);
        Ok(())
    }
}
