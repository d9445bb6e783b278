//! Conversion between timeline positions and time of day.
//!
//! The timeline is a vertical column of 24 hours, each `hour_height` units
//! tall. Position `0` is midnight at the top; `hour_height * 24` is the bottom
//! edge, which only [`TimeOfDay::END_OF_DAY`] maps to.

use crate::time_of_day::{MINUTES_PER_DAY, TimeOfDay};

/// Vertical offset within the column, in layout units.
pub type Position = f64;

pub const TOTAL_HOURS: u32 = 24;

// Absorbs float error so exact positions don't floor to the previous minute.
const MINUTE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    hour_height: f64,
}

impl TimelineGeometry {
    /// `hour_height` must be positive.
    pub fn new(hour_height: f64) -> Self {
        debug_assert!(hour_height > 0.0, "hour_height must be positive");
        TimelineGeometry { hour_height }
    }

    pub fn hour_height(&self) -> f64 {
        self.hour_height
    }

    pub fn column_height(&self) -> f64 {
        self.hour_height * TOTAL_HOURS as f64
    }

    /// Position of the top edge of `time`.
    pub fn position_of(&self, time: TimeOfDay) -> Position {
        if time.is_end_of_day() {
            return self.column_height();
        }
        time.hour() as f64 * self.hour_height + time.minute() as f64 * self.hour_height / 60.0
    }

    /// Time of day at `position`, optionally snapped to `round_to_minutes`.
    ///
    /// Out-of-range positions are clamped to `00:00..=23:59`. Rounding is
    /// half-up; a round-up to minute 60 carries into the next hour, except at
    /// 23h where the minute pins to 59. This never returns `END_OF_DAY`.
    pub fn time_of(&self, position: Position, round_to_minutes: u32) -> TimeOfDay {
        let total_minutes = position * 60.0 / self.hour_height + MINUTE_EPSILON;

        if !(total_minutes > 0.0) {
            return TimeOfDay::MIDNIGHT;
        }
        if total_minutes >= MINUTES_PER_DAY as f64 {
            return last_minute();
        }

        let hour = ((total_minutes / 60.0).floor() as u32).min(23);
        let mut minute = ((total_minutes - hour as f64 * 60.0).floor() as u32).min(59);

        if round_to_minutes > 1 {
            let remainder = minute % round_to_minutes;
            minute = if remainder * 2 >= round_to_minutes {
                minute + (round_to_minutes - remainder)
            } else {
                minute - remainder
            };

            if minute >= 60 {
                return if hour < 23 {
                    TimeOfDay::new(hour + 1, 0).unwrap_or(TimeOfDay::MIDNIGHT)
                } else {
                    last_minute()
                };
            }
        }

        TimeOfDay::new(hour, minute).unwrap_or_else(last_minute)
    }
}

fn last_minute() -> TimeOfDay {
    TimeOfDay::from_minutes(MINUTES_PER_DAY as u32 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_HEIGHT: f64 = 90.0;

    fn geometry() -> TimelineGeometry {
        TimelineGeometry::new(HOUR_HEIGHT)
    }

    fn t(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    #[test]
    fn round_trip_on_five_minute_grid() {
        let g = geometry();
        for hour in 0..24 {
            for minute in (0..60).step_by(5) {
                let time = t(hour, minute);
                assert_eq!(g.time_of(g.position_of(time), 5), time, "round trip of {time}");
            }
        }
    }

    #[test]
    fn round_trip_survives_awkward_hour_height() {
        let g = TimelineGeometry::new(100.0 / 3.0);
        for hour in 0..24 {
            for minute in 0..60 {
                let time = t(hour, minute);
                assert_eq!(g.time_of(g.position_of(time), 1), time);
            }
        }
    }

    #[test]
    fn position_is_monotonic() {
        let g = geometry();
        let mut previous = g.position_of(TimeOfDay::MIDNIGHT);
        for minutes in 1..=MINUTES_PER_DAY as u32 {
            let current = g.position_of(TimeOfDay::from_minutes(minutes));
            assert!(current >= previous);
            assert!(current <= g.column_height());
            previous = current;
        }
    }

    #[test]
    fn end_of_day_is_bottom_edge() {
        let g = geometry();
        assert_eq!(g.position_of(TimeOfDay::END_OF_DAY), HOUR_HEIGHT * 24.0);
        assert_eq!(g.position_of(TimeOfDay::MIDNIGHT), 0.0);
    }

    #[test]
    fn rounds_up_across_hour_boundary() {
        let g = geometry();
        assert_eq!(g.time_of(14.92 * HOUR_HEIGHT, 15), t(15, 0));
    }

    #[test]
    fn rounding_is_half_up() {
        let g = geometry();
        // 10:02 and 10:03 on a 5 minute grid
        assert_eq!(g.time_of(g.position_of(t(10, 2)), 5), t(10, 0));
        assert_eq!(g.time_of(g.position_of(t(10, 3)), 5), t(10, 5));
        // exactly half way on a 10 minute grid
        assert_eq!(g.time_of(g.position_of(t(10, 5)), 10), t(10, 10));
    }

    #[test]
    fn no_rounding_truncates_to_minute() {
        let g = geometry();
        let position = g.position_of(t(7, 41)) + 1.0;
        assert_eq!(g.time_of(position, 1), t(7, 41));
    }

    #[test]
    fn last_hour_round_up_pins_to_59() {
        let g = geometry();
        let position = g.position_of(t(23, 58));
        assert_eq!(g.time_of(position, 5), t(23, 59));
    }

    #[test]
    fn clamps_out_of_range_positions() {
        let g = geometry();
        assert_eq!(g.time_of(-250.0, 5), TimeOfDay::MIDNIGHT);
        assert_eq!(g.time_of(g.column_height(), 5), t(23, 59));
        assert_eq!(g.time_of(g.column_height() * 3.0, 1), t(23, 59));
        assert_eq!(g.time_of(f64::NAN, 5), TimeOfDay::MIDNIGHT);
    }
}
