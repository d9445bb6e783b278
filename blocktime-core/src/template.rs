//! Reusable activity blocks and the catalog that holds them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::error::{BlockTimeError, BlockTimeResult};
use crate::store::TemplateStore;

/// A named activity with a fixed duration, not tied to any date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub id: Uuid,
    pub title: String,
    pub duration_minutes: u32,
    pub color: Color,
}

impl EventTemplate {
    pub fn new(title: impl Into<String>, duration_minutes: u32, color: Color) -> BlockTimeResult<Self> {
        let template = EventTemplate {
            id: Uuid::new_v4(),
            title: title.into(),
            duration_minutes,
            color,
        };
        template.validate()?;
        Ok(template)
    }

    pub fn validate(&self) -> BlockTimeResult<()> {
        if self.title.trim().is_empty() {
            return Err(BlockTimeError::InvalidTitle);
        }
        if self.duration_minutes == 0 {
            return Err(BlockTimeError::InvalidDuration);
        }
        Ok(())
    }

    /// Seeded when the catalog is empty.
    pub fn defaults() -> Vec<EventTemplate> {
        [
            ("Cooking", 120, Color::ORANGE),
            ("Exercise", 50, Color::GREEN),
            ("Study", 120, Color::BLUE),
            ("Eat", 30, Color::PURPLE),
            ("Break", 50, Color::TEAL),
        ]
        .into_iter()
        .map(|(title, duration_minutes, color)| EventTemplate {
            id: Uuid::new_v4(),
            title: title.to_string(),
            duration_minutes,
            color,
        })
        .collect()
    }
}

/// Templates available to drag onto the timeline.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<EventTemplate>,
}

impl TemplateCatalog {
    pub fn new(templates: Vec<EventTemplate>) -> Self {
        TemplateCatalog { templates }
    }

    /// Load templates from `store`, seeding and saving the defaults when
    /// there are none.
    pub fn load_or_seed<S: TemplateStore>(store: &mut S) -> BlockTimeResult<Self> {
        let templates = store.load_templates()?;
        if !templates.is_empty() {
            return Ok(TemplateCatalog { templates });
        }

        tracing::debug!("template catalog empty, seeding defaults");
        let defaults = EventTemplate::defaults();
        for template in &defaults {
            store.save_template(template)?;
        }
        Ok(TemplateCatalog { templates: defaults })
    }

    pub fn templates(&self) -> &[EventTemplate] {
        &self.templates
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Exact, case-sensitive title lookup.
    pub fn find(&self, title: &str) -> Option<&EventTemplate> {
        self.templates.iter().find(|t| t.title == title)
    }

    pub fn add<S: TemplateStore>(&mut self, store: &mut S, template: EventTemplate) -> BlockTimeResult<()> {
        template.validate()?;
        store.save_template(&template)?;
        self.templates.push(template);
        Ok(())
    }

    /// Remove the template titled `title`. Returns the removed template, or
    /// `None` if there was no match.
    pub fn remove<S: TemplateStore>(&mut self, store: &mut S, title: &str) -> BlockTimeResult<Option<EventTemplate>> {
        let Some(index) = self.templates.iter().position(|t| t.title == title) else {
            return Ok(None);
        };

        store.delete_template(&self.templates[index])?;
        Ok(Some(self.templates.remove(index)))
    }
}
