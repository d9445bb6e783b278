//! Event rectangles on the timeline, and the gestures that move them.
//!
//! Every function here is pure and total. Gesture input is fuzzy, so invalid
//! geometry is clamped or ignored rather than reported.

use chrono::NaiveDate;

use crate::event::Event;
use crate::geometry::{Position, TimelineGeometry};
use crate::template::EventTemplate;
use crate::time_of_day::{TimeOfDay, TimeSpan};

/// An event's on-screen rectangle, in the same units as the column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: Position,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> Position {
        self.y + self.height
    }

    fn with_y(self, y: Position) -> Self {
        Rect { y, ..self }
    }
}

/// Layout constants for one day column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    /// Smallest height a resize gesture may leave, and the shortest span a
    /// commit will produce.
    pub min_event_height: f64,
    /// Distance from the bottom edge within which a commit snaps to end of day.
    pub edge_tolerance: f64,
    /// Granularity used when a gesture is committed.
    pub snap_minutes: u32,
    pub column_width: f64,
    /// Horizontal margin on each side of an event.
    pub event_inset: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementConfig {
            min_event_height: 30.0,
            edge_tolerance: 5.0,
            snap_minutes: 5,
            column_width: 340.0,
            event_inset: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPlacement {
    geometry: TimelineGeometry,
    config: PlacementConfig,
}

impl EventPlacement {
    pub fn new(geometry: TimelineGeometry, config: PlacementConfig) -> Self {
        EventPlacement { geometry, config }
    }

    pub fn geometry(&self) -> &TimelineGeometry {
        &self.geometry
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn column_height(&self) -> f64 {
        self.geometry.column_height()
    }

    /// Rectangle for `event` as shown on `day`'s column.
    ///
    /// Times outside `day` are clamped to its edges, so the height is never
    /// negative for an event whose end is after its start.
    pub fn rect_for(&self, event: &Event, day: NaiveDate) -> Rect {
        let start = TimeOfDay::within_day(event.start, day);
        let end = TimeOfDay::within_day(event.end, day);
        self.rect_for_span(TimeSpan::new(start, end))
    }

    pub fn rect_for_span(&self, span: TimeSpan) -> Rect {
        let y = self.geometry.position_of(span.start);
        let height = (self.geometry.position_of(span.end) - y).max(0.0);
        Rect {
            x: self.config.event_inset,
            y,
            width: self.config.column_width - 2.0 * self.config.event_inset,
            height,
        }
    }

    /// Translate `rect` by `delta_y`, clamped so it stays inside the column.
    pub fn apply_move(&self, rect: Rect, delta_y: f64) -> Rect {
        let max_y = (self.column_height() - rect.height).max(0.0);
        rect.with_y((rect.y + delta_y).clamp(0.0, max_y))
    }

    /// Drag the top edge. The update is ignored if the top would leave the
    /// column or the height would drop below the minimum.
    pub fn apply_top_resize(&self, rect: Rect, delta_y: f64) -> Rect {
        let y = rect.y + delta_y;
        let height = rect.height - delta_y;

        if y < 0.0 || y >= self.column_height() || height < self.config.min_event_height {
            return rect;
        }
        Rect { y, height, ..rect }
    }

    /// Drag the bottom edge. The update is ignored if the height would drop
    /// below the minimum or the bottom would pass the column's end.
    pub fn apply_bottom_resize(&self, rect: Rect, delta_y: f64) -> Rect {
        let height = rect.height + delta_y;

        if height < self.config.min_event_height || rect.y + height > self.column_height() {
            return rect;
        }
        Rect { height, ..rect }
    }

    /// Turn a finished gesture's rectangle into snapped times.
    ///
    /// Callers should redraw from [`EventPlacement::rect_for_span`] on the
    /// result so the rectangle lands on a round time.
    pub fn commit_rect(&self, rect: Rect) -> TimeSpan {
        let column_height = self.column_height();
        let snap = self.config.snap_minutes;

        let start_y = rect.y.clamp(0.0, column_height);
        let end_y = (start_y + self.config.min_event_height)
            .max(rect.bottom())
            .clamp(0.0, column_height);

        let at_bottom_edge = end_y >= column_height - self.config.edge_tolerance;

        let start = self.geometry.time_of(start_y, snap);
        let end = if at_bottom_edge {
            TimeOfDay::END_OF_DAY
        } else {
            self.geometry.time_of(end_y, snap)
        };

        tracing::debug!(start_y, end_y, %start, %end, "committed rect");
        TimeSpan::new(start, end)
    }

    /// Height a template occupies on the column.
    pub fn template_height(&self, template: &EventTemplate) -> f64 {
        template.duration_minutes as f64 / 60.0 * self.geometry.hour_height()
    }

    /// Rectangle for `template` centred on `drop_y`, shifted to stay inside
    /// the column and never above its top.
    pub fn template_rect_at(&self, template: &EventTemplate, drop_y: Position) -> Rect {
        let height = self.template_height(template);
        let y = (drop_y - height / 2.0)
            .min(self.column_height() - height)
            .max(0.0);

        Rect {
            x: self.config.event_inset,
            y,
            width: self.config.column_width - 2.0 * self.config.event_inset,
            height,
        }
    }

    /// Times for a template dropped at `drop_y`.
    ///
    /// The start snaps like a commit; the end keeps the template's full
    /// duration, capped at the end of the day.
    pub fn place_template_at(&self, template: &EventTemplate, drop_y: Position) -> TimeSpan {
        let rect = self.template_rect_at(template, drop_y);
        let start = self.geometry.time_of(rect.y, self.config.snap_minutes);
        let end = start.saturating_add_minutes(template.duration_minutes);

        tracing::debug!(template = %template.title, drop_y, y = rect.y, %start, %end, "placed template");
        TimeSpan::new(start, end)
    }
}

impl Default for EventPlacement {
    fn default() -> Self {
        EventPlacement::new(TimelineGeometry::new(90.0), PlacementConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    const HOUR_HEIGHT: f64 = 90.0;

    fn placement() -> EventPlacement {
        EventPlacement::default()
    }

    fn rect(y: f64, height: f64) -> Rect {
        Rect {
            x: 8.0,
            y,
            width: 324.0,
            height,
        }
    }

    fn t(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn template(minutes: u32) -> EventTemplate {
        EventTemplate::new("Exercise", minutes, Color::GREEN).unwrap()
    }

    #[test]
    fn rect_for_uses_event_times() {
        let span = TimeSpan::new(t(10, 0), t(11, 30));
        let event = Event::on_day("Study", day(), span, Color::BLUE);
        let r = placement().rect_for(&event, day());

        assert_eq!(r.y, 10.0 * HOUR_HEIGHT);
        assert_eq!(r.height, 1.5 * HOUR_HEIGHT);
        assert_eq!((r.x, r.width), (8.0, 324.0));
    }

    #[test]
    fn rect_for_event_ending_at_midnight_reaches_bottom() {
        let span = TimeSpan::new(t(22, 0), TimeOfDay::END_OF_DAY);
        let event = Event::on_day("Wind down", day(), span, Color::TEAL);
        let r = placement().rect_for(&event, day());

        assert_eq!(r.bottom(), HOUR_HEIGHT * 24.0);
        assert_eq!(r.height, 2.0 * HOUR_HEIGHT);
    }

    #[test]
    fn rect_for_event_crossing_midnight_is_not_negative() {
        let start = day().and_hms_opt(23, 0, 0).unwrap();
        let end = day().succ_opt().unwrap().and_hms_opt(1, 0, 0).unwrap();
        let event = Event::new("Late", start, end, Color::BLUE);
        let r = placement().rect_for(&event, day());

        assert!(r.height >= 0.0);
        assert_eq!(r.bottom(), HOUR_HEIGHT * 24.0);
    }

    #[test]
    fn move_translates_within_column() {
        let moved = placement().apply_move(rect(810.0, 90.0), 45.0);
        assert_eq!(moved.y, 855.0);
        assert_eq!(moved.height, 90.0);
    }

    #[test]
    fn move_clamps_to_edges() {
        let p = placement();
        assert_eq!(p.apply_move(rect(20.0, 90.0), -500.0).y, 0.0);
        assert_eq!(p.apply_move(rect(2000.0, 90.0), 500.0).y, 2160.0 - 90.0);
    }

    #[test]
    fn top_resize_moves_top_edge_only() {
        let r = placement().apply_top_resize(rect(810.0, 90.0), -45.0);
        assert_eq!(r.y, 765.0);
        assert_eq!(r.height, 135.0);
        assert_eq!(r.bottom(), 900.0);
    }

    #[test]
    fn top_resize_rejects_invalid_updates() {
        let p = placement();
        let original = rect(810.0, 90.0);

        assert_eq!(p.apply_top_resize(original, 70.0), original, "too short");
        assert_eq!(p.apply_top_resize(rect(10.0, 90.0), -20.0), rect(10.0, 90.0), "above top");
    }

    #[test]
    fn bottom_resize_never_goes_below_min_height() {
        let p = placement();
        let original = rect(810.0, 90.0);

        for delta in [-59.0, -60.1, -90.0, -1000.0, f64::MIN / 2.0] {
            let r = p.apply_bottom_resize(original, delta);
            assert!(r.height >= p.config().min_event_height, "delta {delta}");
        }
        assert_eq!(p.apply_bottom_resize(original, -60.0).height, 30.0);
    }

    #[test]
    fn bottom_resize_stops_at_column_end() {
        let p = placement();
        let original = rect(2000.0, 90.0);
        assert_eq!(p.apply_bottom_resize(original, 100.0), original);
        assert_eq!(p.apply_bottom_resize(original, 70.0).bottom(), 2160.0);
    }

    #[test]
    fn commit_snaps_exact_hour() {
        let span = placement().commit_rect(rect(10.0 * 90.0, 90.0));
        assert_eq!(span, TimeSpan::new(t(10, 0), t(11, 0)));

        let span = placement().commit_rect(rect(810.0, 90.0));
        assert_eq!(span, TimeSpan::new(t(9, 0), t(10, 0)));
    }

    #[test]
    fn commit_snaps_to_five_minutes() {
        // 10:07 to 10:52 in raw pixels
        let r = rect(607.0 * 1.5, 45.0 * 1.5);
        let span = placement().commit_rect(r);
        assert_eq!(span, TimeSpan::new(t(10, 5), t(10, 50)));
    }

    #[test]
    fn commit_near_bottom_edge_ends_at_midnight() {
        let p = placement();
        let span = p.commit_rect(rect(2155.0 - 90.0, 90.0));
        assert_eq!(span.end, TimeOfDay::END_OF_DAY);

        let (_, end) = span.on(day());
        assert_eq!(end, day().succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn commit_enforces_minimum_duration() {
        let span = placement().commit_rect(rect(900.0, 5.0));
        assert_eq!(span, TimeSpan::new(t(10, 0), t(10, 20)));
    }

    #[test]
    fn commit_clamps_out_of_bounds_rect() {
        let span = placement().commit_rect(rect(-40.0, 90.0));
        assert_eq!(span.start, TimeOfDay::MIDNIGHT);
    }

    #[test]
    fn committed_span_redraws_on_grid() {
        let p = placement();
        let span = p.commit_rect(rect(812.3, 88.1));
        let snapped = p.rect_for_span(span);
        assert_eq!(snapped.y % 7.5, 0.0);
        assert_eq!(snapped.bottom() % 7.5, 0.0);
    }

    #[test]
    fn template_is_centred_on_drop_point() {
        let p = placement();
        let r = p.template_rect_at(&template(50), 810.0);
        assert_eq!(r.height, 75.0);
        assert_eq!(r.y, 772.5);

        let span = p.commit_rect(r);
        assert_eq!(span.start, t(8, 35));
        assert_eq!(span.start.minute() % 5, 0);
    }

    #[test]
    fn place_template_keeps_duration() {
        let span = placement().place_template_at(&template(50), 810.0);
        assert_eq!(span, TimeSpan::new(t(8, 35), t(9, 25)));
    }

    #[test]
    fn place_template_shifts_up_at_bottom() {
        let p = placement();
        let r = p.template_rect_at(&template(120), 2150.0);
        assert_eq!(r.bottom(), 2160.0);

        let span = p.place_template_at(&template(120), 2150.0);
        assert_eq!(span, TimeSpan::new(t(22, 0), TimeOfDay::END_OF_DAY));
    }

    #[test]
    fn place_template_never_above_top() {
        let p = placement();
        assert_eq!(p.template_rect_at(&template(120), 10.0).y, 0.0);
        // Longer than the whole day: pinned at the top
        assert_eq!(p.template_rect_at(&template(26 * 60), 1000.0).y, 0.0);
    }
}
