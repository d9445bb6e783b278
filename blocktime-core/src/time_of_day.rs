//! Wall-clock time within a single calendar day.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{BlockTimeError, BlockTimeResult};

pub const MINUTES_PER_HOUR: u16 = 60;
pub const MINUTES_PER_DAY: u16 = 24 * MINUTES_PER_HOUR;

/// A time of day stored as minutes since midnight.
///
/// Valid clock times are `00:00..=23:59`. The extra value [`TimeOfDay::END_OF_DAY`]
/// stands for midnight of the following day, so an event can run to the
/// bottom edge of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    /// Clock time from hour and minute. Returns `None` outside `00:00..=23:59`.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(TimeOfDay((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Minutes since midnight, saturating at [`TimeOfDay::END_OF_DAY`].
    pub fn from_minutes(minutes: u32) -> Self {
        TimeOfDay(minutes.min(MINUTES_PER_DAY as u32) as u16)
    }

    pub fn minutes(self) -> u32 {
        self.0 as u32
    }

    /// Hour component. `END_OF_DAY` reports 24.
    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }

    pub fn is_end_of_day(self) -> bool {
        self == Self::END_OF_DAY
    }

    /// Time-of-day of `datetime` relative to `day`, clamped into the day.
    ///
    /// Anything before `day` maps to midnight; anything at or after the next
    /// day's midnight maps to `END_OF_DAY`.
    pub fn within_day(datetime: NaiveDateTime, day: NaiveDate) -> Self {
        let start = day.and_time(NaiveTime::MIN);
        if datetime <= start {
            return Self::MIDNIGHT;
        }
        if datetime >= start + Duration::days(1) {
            return Self::END_OF_DAY;
        }
        Self::from_time(datetime.time())
    }

    /// Drop the date component, keeping hour and minute.
    pub fn from_time(time: NaiveTime) -> Self {
        TimeOfDay((time.hour() * 60 + time.minute()) as u16)
    }

    /// Full date-time for this time on `day`. `END_OF_DAY` becomes the next
    /// day at 00:00.
    pub fn on(self, day: NaiveDate) -> NaiveDateTime {
        day.and_time(NaiveTime::MIN) + Duration::minutes(self.minutes() as i64)
    }

    /// Add minutes, saturating at `END_OF_DAY`.
    pub fn saturating_add_minutes(self, minutes: u32) -> Self {
        Self::from_minutes(self.minutes().saturating_add(minutes))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = BlockTimeError;

    /// Parse `HH:MM`. `24:00` is accepted as end of day.
    fn from_str(s: &str) -> BlockTimeResult<Self> {
        let invalid = || BlockTimeError::InvalidTime(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;

        if hour == 24 && minute == 0 {
            return Ok(Self::END_OF_DAY);
        }
        TimeOfDay::new(hour, minute).ok_or_else(invalid)
    }
}

/// A committed start/end pair produced by a gesture or a template drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeSpan {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        TimeSpan { start, end }
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Full date-times on `day`.
    pub fn on(&self, day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (self.start.on(day), self.end.on(day))
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(TimeOfDay::new(23, 59).is_some());
        assert!(TimeOfDay::new(24, 0).is_none());
        assert!(TimeOfDay::new(10, 60).is_none());
    }

    #[test]
    fn within_day_maps_next_midnight_to_end_of_day() {
        let next_midnight = day().succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(TimeOfDay::within_day(next_midnight, day()), TimeOfDay::END_OF_DAY);

        let this_midnight = day().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(TimeOfDay::within_day(this_midnight, day()), TimeOfDay::MIDNIGHT);
    }

    #[test]
    fn within_day_clamps_other_days() {
        let yesterday = day().pred_opt().unwrap().and_hms_opt(22, 0, 0).unwrap();
        let two_days_on = day().succ_opt().unwrap().and_hms_opt(3, 0, 0).unwrap();

        assert_eq!(TimeOfDay::within_day(yesterday, day()), TimeOfDay::MIDNIGHT);
        assert_eq!(TimeOfDay::within_day(two_days_on, day()), TimeOfDay::END_OF_DAY);
    }

    #[test]
    fn end_of_day_rolls_to_next_date() {
        let dt = TimeOfDay::END_OF_DAY.on(day());
        assert_eq!(dt, NaiveDate::from_ymd_opt(2025, 3, 21).unwrap().and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn parse_and_display() {
        let t: TimeOfDay = "09:05".parse().unwrap();
        assert_eq!((t.hour(), t.minute()), (9, 5));
        assert_eq!(t.to_string(), "09:05");
        assert_eq!("24:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::END_OF_DAY);
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["9", "25:00", "10:75", "ab:cd", "10:00:00", "24:30"] {
            assert!(
                matches!(input.parse::<TimeOfDay>(), Err(BlockTimeError::InvalidTime(_))),
                "{input} should not parse"
            );
        }
    }

    #[test]
    fn saturating_add_stops_at_end_of_day() {
        let t = TimeOfDay::new(23, 30).unwrap();
        assert_eq!(t.saturating_add_minutes(45), TimeOfDay::END_OF_DAY);
        assert_eq!(t.saturating_add_minutes(15).to_string(), "23:45");
    }
}
