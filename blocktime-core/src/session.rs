//! A day-view session: the day's [`ScheduleModel`] plus the store that
//! persists it.
//!
//! The session is the only thing that mutates its model. Every change is
//! validated and written to the store before the model is touched, so a
//! failure leaves the in-memory state as it was.

use chrono::NaiveDate;

use crate::color::Color;
use crate::error::{BlockTimeError, BlockTimeResult};
use crate::event::{Event, EventId};
use crate::geometry::Position;
use crate::placement::{EventPlacement, Rect};
use crate::schedule::ScheduleModel;
use crate::store::EventStore;
use crate::template::EventTemplate;
use crate::time_of_day::{TimeOfDay, TimeSpan};

pub const DEFAULT_EVENT_TITLE: &str = "New Event";

pub struct DaySession<S: EventStore> {
    day: NaiveDate,
    model: ScheduleModel,
    store: S,
    placement: EventPlacement,
}

impl<S: EventStore> DaySession<S> {
    /// Load `day`'s events from `store`.
    pub fn open(day: NaiveDate, store: S, placement: EventPlacement) -> BlockTimeResult<Self> {
        let model = load_model(&store, day)?;

        Ok(DaySession {
            day,
            model,
            store,
            placement,
        })
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn model(&self) -> &ScheduleModel {
        &self.model
    }

    pub fn placement(&self) -> &EventPlacement {
        &self.placement
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.model.get(id)
    }

    /// Every event with the rectangle it occupies, in start order.
    pub fn layout(&self) -> Vec<(&Event, Rect)> {
        self.model
            .all()
            .into_iter()
            .map(|event| (event, self.placement.rect_for(event, self.day)))
            .collect()
    }

    pub fn rect_of(&self, id: &EventId) -> BlockTimeResult<Rect> {
        let event = self.model.get(id).ok_or(BlockTimeError::NotFound(*id))?;
        Ok(self.placement.rect_for(event, self.day))
    }

    /// Add a fully specified event.
    pub fn add_event(&mut self, event: Event) -> BlockTimeResult<EventId> {
        event.validate()?;
        if self.model.contains(&event.id) {
            return Err(BlockTimeError::DuplicateId(event.id));
        }

        self.store.save_event(&event, self.day)?;
        let id = event.id;
        self.model.add(event)?;
        Ok(id)
    }

    pub fn create_event(&mut self, title: &str, span: TimeSpan, color: Color) -> BlockTimeResult<EventId> {
        self.add_event(Event::on_day(title, self.day, span, color))
    }

    /// Drag-create: drop `template` centred on `drop_y`.
    pub fn create_from_template(&mut self, template: &EventTemplate, drop_y: Position) -> BlockTimeResult<EventId> {
        let span = self.placement.place_template_at(template, drop_y);
        self.create_event(&template.title, span, template.color)
    }

    /// Tap on empty space: a one hour event starting at the hour under `y`.
    pub fn add_default_event(&mut self, y: Position) -> BlockTimeResult<EventId> {
        let hour = self.placement.geometry().time_of(y, 1).hour();
        let start = TimeOfDay::new(hour, 0).unwrap_or(TimeOfDay::MIDNIGHT);
        let span = TimeSpan::new(start, start.saturating_add_minutes(60));
        self.create_event(DEFAULT_EVENT_TITLE, span, Color::FALLBACK)
    }

    /// Persist the outcome of a finished gesture on `id`.
    pub fn commit_gesture(&mut self, id: &EventId, rect: Rect) -> BlockTimeResult<TimeSpan> {
        let mut event = self
            .model
            .get(id)
            .cloned()
            .ok_or(BlockTimeError::NotFound(*id))?;

        let span = self.placement.commit_rect(rect);
        (event.start, event.end) = span.on(self.day);
        event.validate()?;

        self.store.save_event(&event, self.day)?;
        self.model.update(event)?;
        tracing::debug!(%id, %span, "gesture committed");
        Ok(span)
    }

    /// Save a direct edit. Rejects blank titles and `start >= end`.
    pub fn edit_event(&mut self, event: Event) -> BlockTimeResult<()> {
        event.validate()?;
        if !self.model.contains(&event.id) {
            return Err(BlockTimeError::NotFound(event.id));
        }

        self.store.save_event(&event, self.day)?;
        self.model.update(event)
    }

    /// Delete `id`. Returns the removed event, or `None` if it was already
    /// gone.
    pub fn delete_event(&mut self, id: &EventId) -> BlockTimeResult<Option<Event>> {
        let Some(event) = self.model.get(id).cloned() else {
            tracing::debug!(%id, "delete of unknown event ignored");
            return Ok(None);
        };

        self.store.delete_event(&event)?;
        self.model.remove(id).map(Some)
    }

    /// Replace the whole day with a generated schedule.
    ///
    /// The new batch is validated up front; old events are only removed once
    /// it is known to be insertable. An empty batch leaves the day unchanged.
    ///
    /// Store writes are not atomic. If one fails partway, the model is
    /// reloaded from the store so it shows what actually got written.
    pub fn apply_generated(&mut self, events: Vec<Event>) -> BlockTimeResult<usize> {
        if events.is_empty() {
            return Ok(0);
        }

        for event in &events {
            event.validate()?;
        }
        let mut staged = ScheduleModel::new();
        staged.replace_all(events.clone())?;

        let old: Vec<Event> = self.model.all().into_iter().cloned().collect();
        if let Err(e) = self.write_replacement(&old, &events) {
            tracing::warn!(day = %self.day, error = %e, "generated schedule only partly saved");
            self.model = load_model(&self.store, self.day)?;
            return Err(e);
        }

        let count = events.len();
        self.model = staged;
        tracing::debug!(day = %self.day, replaced = old.len(), inserted = count, "applied generated schedule");
        Ok(count)
    }

    fn write_replacement(&mut self, old: &[Event], new: &[Event]) -> BlockTimeResult<()> {
        for event in old {
            self.store.delete_event(event)?;
        }
        for event in new {
            self.store.save_event(event, self.day)?;
        }
        Ok(())
    }

    /// Events in start order, cloned for exporters.
    pub fn events(&self) -> Vec<Event> {
        self.model.all().into_iter().cloned().collect()
    }
}

/// The stored events for `day`. A repeated id keeps the first copy.
fn load_model<S: EventStore>(store: &S, day: NaiveDate) -> BlockTimeResult<ScheduleModel> {
    let mut model = ScheduleModel::new();
    for event in store.load_events(day)? {
        if let Err(e) = model.add(event) {
            tracing::warn!(error = %e, %day, "skipping duplicate stored event");
        }
    }
    Ok(model)
}

impl<S: EventStore> std::fmt::Debug for DaySession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaySession")
            .field("day", &self.day)
            .field("events", &self.model.len())
            .finish()
    }
}
