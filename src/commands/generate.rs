use anyhow::Result;
use blocktime_core::config::BlockTimeConfig;
use blocktime_core::generator::{ScheduleRequest, parse_schedule};
use chrono::NaiveDate;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::generator_client::GeneratorClient;
use crate::render::{pluralize, render_event};
use crate::utils::tui;

pub async fn run(
    config: &BlockTimeConfig,
    day: NaiveDate,
    constraints: Option<String>,
    yes: bool,
) -> Result<()> {
    let (catalog, _) = super::open_catalog(config)?;

    let mut request = ScheduleRequest::new(day, catalog.templates().to_vec());
    request.start_hour = config.generator.start_hour;
    request.end_hour = config.generator.end_hour;
    request.constraints = constraints;
    request.validate()?;

    let client = GeneratorClient::from_config(&config.generator)?;

    let response = tui::spin_while("Generating schedule", client.complete(&request.prompt())).await;

    let events = parse_schedule(&response?, catalog.templates(), day)?;
    if events.is_empty() {
        println!("{}", "The generator returned no events. Nothing changed.".dimmed());
        return Ok(());
    }

    for event in &events {
        println!("{}", render_event(event, day));
    }

    let mut session = super::open_session(config, day)?;
    let existing = session.model().len();

    if existing > 0 && !yes {
        println!();
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Replace {} existing {}?",
                existing,
                pluralize("event", existing)
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Kept the current schedule".dimmed());
            return Ok(());
        }
    }

    let count = session.apply_generated(events)?;
    println!(
        "{}",
        format!("Scheduled {} {}", count, pluralize("event", count)).green()
    );
    Ok(())
}
