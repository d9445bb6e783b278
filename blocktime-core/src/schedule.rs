//! The authoritative set of events for the day being viewed.

use std::collections::{HashMap, HashSet};

use crate::error::{BlockTimeError, BlockTimeResult};
use crate::event::{Event, EventId};

/// Events keyed by id. Insertion order is not kept; [`ScheduleModel::all`]
/// returns events ordered by start time.
#[derive(Debug, Clone, Default)]
pub struct ScheduleModel {
    events: HashMap<EventId, Event>,
}

impl ScheduleModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.get(id)
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.events.contains_key(id)
    }

    pub fn add(&mut self, event: Event) -> BlockTimeResult<()> {
        if self.events.contains_key(&event.id) {
            return Err(BlockTimeError::DuplicateId(event.id));
        }
        self.events.insert(event.id, event);
        Ok(())
    }

    pub fn update(&mut self, event: Event) -> BlockTimeResult<()> {
        match self.events.get_mut(&event.id) {
            Some(existing) => {
                *existing = event;
                Ok(())
            }
            None => Err(BlockTimeError::NotFound(event.id)),
        }
    }

    pub fn remove(&mut self, id: &EventId) -> BlockTimeResult<Event> {
        self.events.remove(id).ok_or(BlockTimeError::NotFound(*id))
    }

    /// Swap in a whole new set. Fails without touching the model if `events`
    /// repeats an id.
    pub fn replace_all(&mut self, events: Vec<Event>) -> BlockTimeResult<()> {
        let mut seen = HashSet::with_capacity(events.len());
        if let Some(duplicate) = events.iter().find(|e| !seen.insert(e.id)) {
            return Err(BlockTimeError::DuplicateId(duplicate.id));
        }

        self.events = events.into_iter().map(|e| (e.id, e)).collect();
        Ok(())
    }

    /// Events ordered by start time (ties by end, then id).
    pub fn all(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.values().collect();
        events.sort_by(|a, b| (a.start, a.end, a.id).cmp(&(b.start, b.end, b.id)));
        events
    }
}
