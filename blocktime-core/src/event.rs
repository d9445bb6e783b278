//! Timed events placed on a day's timeline.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::error::{BlockTimeError, BlockTimeResult};
use crate::time_of_day::TimeSpan;

/// Opaque event identifier, assigned at creation and never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        EventId(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(EventId)
    }
}

/// A block of time on the calendar.
///
/// `start` and `end` are local wall-clock date-times; `end` may fall on the
/// following date when the event runs to (or past) midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: Color,
}

impl Event {
    /// Create an event with a fresh id.
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime, color: Color) -> Self {
        Event {
            id: EventId::new(),
            title: title.into(),
            start,
            end,
            color,
        }
    }

    /// Create an event on `day` spanning `span`.
    pub fn on_day(title: impl Into<String>, day: NaiveDate, span: TimeSpan, color: Color) -> Self {
        let (start, end) = span.on(day);
        Self::new(title, start, end, color)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Checks applied before an edit is saved: a non-blank title and
    /// `start < end`.
    pub fn validate(&self) -> BlockTimeResult<()> {
        if self.title.trim().is_empty() {
            return Err(BlockTimeError::InvalidTitle);
        }
        if self.start >= self.end {
            return Err(BlockTimeError::InvalidTimeRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
