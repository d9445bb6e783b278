use anyhow::Result;
use blocktime_core::config::BlockTimeConfig;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use crate::render::render_event;

pub fn run(
    config: &BlockTimeConfig,
    day: NaiveDate,
    template_title: &str,
    at: Option<String>,
    y: Option<f64>,
) -> Result<()> {
    let (catalog, _) = super::open_catalog(config)?;
    let Some(template) = catalog.find(template_title) else {
        let available: Vec<_> = catalog.templates().iter().map(|t| t.title.as_str()).collect();
        anyhow::bail!(
            "Template '{}' not found. Available: {}",
            template_title,
            available.join(", ")
        );
    };

    let mut session = super::open_session(config, day)?;

    // The drop point is the block's centre; --at names where its top should land.
    let drop_y = match (at, y) {
        (Some(at), _) => {
            let start = super::parse_time(&at)?;
            let placement = session.placement();
            placement.geometry().position_of(start) + placement.template_height(template) / 2.0
        }
        (None, Some(y)) => y,
        (None, None) => anyhow::bail!("Either --at or --y is required"),
    };

    let id = session.create_from_template(template, drop_y)?;

    if let Some(event) = session.event(&id) {
        println!("{}", "Placed:".green());
        println!("{}", render_event(event, day));
    }
    Ok(())
}
