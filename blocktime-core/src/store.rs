//! Persistence for events and templates.
//!
//! The day session and the template catalog only see the [`EventStore`] and
//! [`TemplateStore`] traits. [`FileStore`] keeps JSON files on disk;
//! [`MemoryStore`] keeps everything in memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::error::{BlockTimeError, BlockTimeResult};
use crate::event::{Event, EventId};
use crate::template::EventTemplate;

pub trait EventStore {
    fn load_events(&self, day: NaiveDate) -> BlockTimeResult<Vec<Event>>;

    /// Insert or replace `event` (matched by id) under `day`.
    fn save_event(&mut self, event: &Event, day: NaiveDate) -> BlockTimeResult<()>;

    /// Delete `event` by id. Deleting an unknown event is not an error.
    fn delete_event(&mut self, event: &Event) -> BlockTimeResult<()>;
}

pub trait TemplateStore {
    fn load_templates(&self) -> BlockTimeResult<Vec<EventTemplate>>;

    /// Insert or replace `template` (matched by id).
    fn save_template(&mut self, template: &EventTemplate) -> BlockTimeResult<()>;

    fn delete_template(&mut self, template: &EventTemplate) -> BlockTimeResult<()>;
}

// =========================================================================
// In-memory store
// =========================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    days: BTreeMap<NaiveDate, Vec<Event>>,
    templates: Vec<EventTemplate>,
}

impl EventStore for MemoryStore {
    fn load_events(&self, day: NaiveDate) -> BlockTimeResult<Vec<Event>> {
        Ok(self.days.get(&day).cloned().unwrap_or_default())
    }

    fn save_event(&mut self, event: &Event, day: NaiveDate) -> BlockTimeResult<()> {
        for events in self.days.values_mut() {
            events.retain(|e| e.id != event.id);
        }
        self.days.entry(day).or_default().push(event.clone());
        Ok(())
    }

    fn delete_event(&mut self, event: &Event) -> BlockTimeResult<()> {
        for events in self.days.values_mut() {
            events.retain(|e| e.id != event.id);
        }
        Ok(())
    }
}

impl TemplateStore for MemoryStore {
    fn load_templates(&self) -> BlockTimeResult<Vec<EventTemplate>> {
        Ok(self.templates.clone())
    }

    fn save_template(&mut self, template: &EventTemplate) -> BlockTimeResult<()> {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template.clone(),
            None => self.templates.push(template.clone()),
        }
        Ok(())
    }

    fn delete_template(&mut self, template: &EventTemplate) -> BlockTimeResult<()> {
        self.templates.retain(|t| t.id != template.id);
        Ok(())
    }
}

// =========================================================================
// File store
// =========================================================================

/// Event as written to disk. The color is kept in its `r,g,b,a` form.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEvent {
    id: EventId,
    title: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    color_rgb: String,
}

impl From<&Event> for StoredEvent {
    fn from(event: &Event) -> Self {
        StoredEvent {
            id: event.id,
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            color_rgb: event.color.to_rgba_string(),
        }
    }
}

impl From<StoredEvent> for Event {
    fn from(stored: StoredEvent) -> Self {
        Event {
            id: stored.id,
            title: stored.title,
            start: stored.start,
            end: stored.end,
            color: Color::decode_or_default(&stored.color_rgb),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredTemplate {
    id: Uuid,
    title: String,
    duration_minutes: u32,
    color_rgb: String,
}

impl From<&EventTemplate> for StoredTemplate {
    fn from(template: &EventTemplate) -> Self {
        StoredTemplate {
            id: template.id,
            title: template.title.clone(),
            duration_minutes: template.duration_minutes,
            color_rgb: template.color.to_rgba_string(),
        }
    }
}

impl From<StoredTemplate> for EventTemplate {
    fn from(stored: StoredTemplate) -> Self {
        EventTemplate {
            id: stored.id,
            title: stored.title,
            duration_minutes: stored.duration_minutes,
            color: Color::decode_or_default(&stored.color_rgb),
        }
    }
}

/// JSON files under a data directory:
///
/// ```text
/// <root>/templates.json
/// <root>/days/2025-03-20.json
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn days_dir(&self) -> PathBuf {
        self.root.join("days")
    }

    fn day_path(&self, day: NaiveDate) -> PathBuf {
        self.days_dir().join(format!("{}.json", day.format("%Y-%m-%d")))
    }

    fn templates_path(&self) -> PathBuf {
        self.root.join("templates.json")
    }

    fn read_day(&self, path: &Path) -> BlockTimeResult<Vec<StoredEvent>> {
        read_json(path)
    }

    /// Every day file on disk, oldest first.
    fn day_files(&self) -> BlockTimeResult<Vec<PathBuf>> {
        let dir = self.days_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "json"))
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Remove `id` from the day file at `path`. Returns whether it was there.
    fn remove_from(&self, path: &Path, id: EventId) -> BlockTimeResult<bool> {
        let mut stored = self.read_day(path)?;
        let before = stored.len();
        stored.retain(|e| e.id != id);

        if stored.len() == before {
            return Ok(false);
        }
        write_json(path, &stored)?;
        Ok(true)
    }
}

impl EventStore for FileStore {
    fn load_events(&self, day: NaiveDate) -> BlockTimeResult<Vec<Event>> {
        let stored = self.read_day(&self.day_path(day))?;
        tracing::debug!(%day, count = stored.len(), "loaded events");
        Ok(stored.into_iter().map(Event::from).collect())
    }

    fn save_event(&mut self, event: &Event, day: NaiveDate) -> BlockTimeResult<()> {
        let path = self.day_path(day);

        // An event belongs to one day only
        for other in self.day_files()? {
            if other != path {
                self.remove_from(&other, event.id)?;
            }
        }

        let mut stored = self.read_day(&path)?;
        let record = StoredEvent::from(event);
        match stored.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = record,
            None => stored.push(record),
        }

        write_json(&path, &stored)?;
        tracing::debug!(id = %event.id, %day, "saved event");
        Ok(())
    }

    fn delete_event(&mut self, event: &Event) -> BlockTimeResult<()> {
        // Try the event's own date first, then everything else
        let likely = self.day_path(event.start.date());
        if self.remove_from(&likely, event.id)? {
            return Ok(());
        }

        for path in self.day_files()? {
            if path != likely && self.remove_from(&path, event.id)? {
                return Ok(());
            }
        }

        tracing::debug!(id = %event.id, "delete of unknown event ignored");
        Ok(())
    }
}

impl TemplateStore for FileStore {
    fn load_templates(&self) -> BlockTimeResult<Vec<EventTemplate>> {
        let stored: Vec<StoredTemplate> = read_json(&self.templates_path())?;
        Ok(stored.into_iter().map(EventTemplate::from).collect())
    }

    fn save_template(&mut self, template: &EventTemplate) -> BlockTimeResult<()> {
        let path = self.templates_path();
        let mut stored: Vec<StoredTemplate> = read_json(&path)?;
        let record = StoredTemplate::from(template);

        match stored.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = record,
            None => stored.push(record),
        }
        write_json(&path, &stored)
    }

    fn delete_template(&mut self, template: &EventTemplate) -> BlockTimeResult<()> {
        let path = self.templates_path();
        let mut stored: Vec<StoredTemplate> = read_json(&path)?;
        stored.retain(|t| t.id != template.id);
        write_json(&path, &stored)
    }
}

/// Read a JSON array, treating a missing file as empty.
fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> BlockTimeResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| BlockTimeError::Store(format!("Failed to parse {}: {e}", path.display())))
}

fn write_json<T: Serialize>(path: &Path, items: &[T]) -> BlockTimeResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(items)
        .map_err(|e| BlockTimeError::Serialization(e.to_string()))?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn event(title: &str, hour: u32) -> Event {
        Event::new(
            title,
            day().and_hms_opt(hour, 0, 0).unwrap(),
            day().and_hms_opt(hour + 1, 0, 0).unwrap(),
            Color::rgba(0.1, 0.2, 0.3, 0.4),
        )
    }

    #[test]
    fn file_store_round_trips_events() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());
        let e = event("Study", 9);

        store.save_event(&e, day()).unwrap();
        let loaded = store.load_events(day()).unwrap();

        assert_eq!(loaded, vec![e]);
        assert!(dir.path().join("days/2025-03-20.json").exists());
    }

    #[test]
    fn file_store_save_replaces_by_id() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());
        let mut e = event("Study", 9);

        store.save_event(&e, day()).unwrap();
        e.title = "Revise".to_string();
        store.save_event(&e, day()).unwrap();

        let loaded = store.load_events(day()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Revise");
    }

    #[test]
    fn file_store_moving_day_removes_old_entry() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());
        let e = event("Study", 9);
        let tomorrow = day().succ_opt().unwrap();

        store.save_event(&e, day()).unwrap();
        store.save_event(&e, tomorrow).unwrap();

        assert!(store.load_events(day()).unwrap().is_empty());
        assert_eq!(store.load_events(tomorrow).unwrap().len(), 1);
    }

    #[test]
    fn file_store_delete_finds_event_on_other_day() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());
        let e = event("Study", 9);
        let other_day = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

        store.save_event(&e, other_day).unwrap();
        store.delete_event(&e).unwrap();
        assert!(store.load_events(other_day).unwrap().is_empty());

        // Unknown events are ignored
        store.delete_event(&event("Ghost", 10)).unwrap();
    }

    #[test]
    fn malformed_color_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let e = event("Study", 9);

        let json = format!(
            r#"[{{"id":"{}","title":"Study","start":"2025-03-20T09:00:00","end":"2025-03-20T10:00:00","color_rgb":"not a color"}}]"#,
            e.id
        );
        std::fs::create_dir_all(dir.path().join("days")).unwrap();
        std::fs::write(dir.path().join("days/2025-03-20.json"), json).unwrap();

        let loaded = store.load_events(day()).unwrap();
        assert_eq!(loaded[0].color, Color::FALLBACK);
    }

    #[test]
    fn corrupt_day_file_is_a_store_error() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::create_dir_all(dir.path().join("days")).unwrap();
        std::fs::write(dir.path().join("days/2025-03-20.json"), "{oops").unwrap();

        assert!(matches!(store.load_events(day()), Err(BlockTimeError::Store(_))));
    }

    #[test]
    fn file_store_templates() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path());
        let defaults = EventTemplate::defaults();

        for template in &defaults {
            store.save_template(template).unwrap();
        }
        store.delete_template(&defaults[0]).unwrap();

        let loaded = store.load_templates().unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded[0].title, "Exercise");
        assert_eq!(loaded[0].color, Color::GREEN);
    }

    #[test]
    fn memory_store_save_moves_between_days() {
        let mut store = MemoryStore::default();
        let e = event("Study", 9);
        let tomorrow = day().succ_opt().unwrap();

        store.save_event(&e, day()).unwrap();
        store.save_event(&e, tomorrow).unwrap();

        assert!(store.load_events(day()).unwrap().is_empty());
        assert_eq!(store.load_events(tomorrow).unwrap(), vec![e]);
    }
}
