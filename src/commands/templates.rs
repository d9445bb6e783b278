use anyhow::Result;
use blocktime_core::color::Color;
use blocktime_core::config::BlockTimeConfig;
use blocktime_core::template::EventTemplate;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn list(config: &BlockTimeConfig) -> Result<()> {
    let (catalog, _) = super::open_catalog(config)?;

    if catalog.is_empty() {
        println!("{}", "No templates".dimmed());
        return Ok(());
    }

    for template in catalog.templates() {
        println!("  {}", template.render());
    }
    Ok(())
}

pub fn add(config: &BlockTimeConfig, title: String, duration: &str, color: Option<String>) -> Result<()> {
    let (mut catalog, mut store) = super::open_catalog(config)?;

    if catalog.find(&title).is_some() {
        anyhow::bail!("A template named '{}' already exists", title);
    }

    let minutes = super::parse_duration_minutes(duration)?;
    let color = super::parse_color(color.as_deref())?.unwrap_or(Color::FALLBACK);
    let template = EventTemplate::new(title, minutes, color)?;

    println!("{} {}", "Added:".green(), template.render());
    catalog.add(&mut store, template)?;
    Ok(())
}

pub fn remove(config: &BlockTimeConfig, title: &str) -> Result<()> {
    let (mut catalog, mut store) = super::open_catalog(config)?;

    match catalog.remove(&mut store, title)? {
        Some(template) => println!("{} {}", "Removed:".red(), template.render()),
        None => println!("{}", format!("No template named '{}'", title).dimmed()),
    }
    Ok(())
}
