mod commands;
mod generator_client;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use blocktime_core::config::BlockTimeConfig;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use blocktime_core::gesture::GestureKind;

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(name = "blocktime")]
#[command(about = "Plan your day by dropping activity blocks onto a 24-hour timeline")]
struct Cli {
    /// Day to work on (YYYY-MM-DD, "today", "tomorrow" or "yesterday")
    #[arg(short, long, global = true)]
    date: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the day's events
    Show {
        /// Also print each event's position on the timeline
        #[arg(long)]
        layout: bool,
    },
    /// Create an event
    Add {
        /// Event title (defaults to "New Event" with --tap)
        title: Option<String>,

        /// Start time (HH:MM)
        #[arg(short, long, required_unless_present = "tap")]
        start: Option<String>,

        /// End time (HH:MM, "24:00" for end of day)
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Duration (e.g., "30m", "1h", "2h30m")
        #[arg(long, conflicts_with = "end")]
        duration: Option<String>,

        /// Color as "red,green,blue,alpha" with components in 0..1
        #[arg(long)]
        color: Option<String>,

        /// Create a one hour event at the hour under this timeline position
        #[arg(long, conflicts_with_all = ["start", "end", "duration"])]
        tap: Option<f64>,
    },
    /// Drop a template onto the timeline
    Place {
        /// Template title (exact match)
        template: String,

        /// Where the block should start (HH:MM)
        #[arg(long, conflicts_with = "y")]
        at: Option<String>,

        /// Timeline position of the block's centre
        #[arg(long, required_unless_present = "at", allow_negative_numbers = true)]
        y: Option<f64>,
    },
    /// Move or resize an event by dragging it
    Drag {
        /// Event id (or unique prefix)
        id: String,

        #[arg(short, long, value_enum, default_value_t = DragKind::Move)]
        kind: DragKind,

        /// Drag steps, as offsets in timeline units relative to the previous step
        #[arg(required = true, allow_negative_numbers = true)]
        deltas: Vec<f64>,

        /// Release without committing
        #[arg(long)]
        cancel: bool,
    },
    /// Edit an event's details
    Edit {
        /// Event id (or unique prefix)
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        /// Start time (HH:MM)
        #[arg(short, long)]
        start: Option<String>,

        /// End time (HH:MM)
        #[arg(short, long)]
        end: Option<String>,

        /// Color as "red,green,blue,alpha"
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an event
    Delete {
        /// Event id (or unique prefix)
        id: String,
    },
    /// Manage activity templates
    Templates {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Generate a schedule for the day from your templates
    Generate {
        /// Extra constraints or preferences for the generator
        #[arg(short, long)]
        constraints: Option<String>,

        /// Replace the day's events without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Export the day's events as .ics files
    Export {
        /// Directory to write to (defaults to export_dir from config)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TemplateCommands {
    List,
    Add {
        title: String,

        /// Duration (e.g., "50m", "2h")
        duration: String,

        /// Color as "red,green,blue,alpha"
        #[arg(long)]
        color: Option<String>,
    },
    Remove {
        title: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DragKind {
    Move,
    Top,
    Bottom,
}

impl From<DragKind> for GestureKind {
    fn from(kind: DragKind) -> Self {
        match kind {
            DragKind::Move => GestureKind::Move,
            DragKind::Top => GestureKind::ResizeTop,
            DragKind::Bottom => GestureKind::ResizeBottom,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(init_filter())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = BlockTimeConfig::load()?;
    let day = resolve_day(cli.date.as_deref())?;

    match cli.command {
        Commands::Show { layout } => commands::show::run(&config, day, layout),
        Commands::Add {
            title,
            start,
            end,
            duration,
            color,
            tap,
        } => match tap {
            Some(y) => commands::add::tap(&config, day, title, y),
            None => commands::add::run(&config, day, title, start, end, duration, color),
        },
        Commands::Place { template, at, y } => commands::place::run(&config, day, &template, at, y),
        Commands::Drag {
            id,
            kind,
            deltas,
            cancel,
        } => commands::drag::run(&config, day, &id, kind.into(), &deltas, cancel),
        Commands::Edit {
            id,
            title,
            start,
            end,
            color,
        } => commands::edit::run(&config, day, &id, title, start, end, color),
        Commands::Delete { id } => commands::delete::run(&config, day, &id),
        Commands::Templates { command } => match command {
            TemplateCommands::List => commands::templates::list(&config),
            TemplateCommands::Add {
                title,
                duration,
                color,
            } => commands::templates::add(&config, title, &duration, color),
            TemplateCommands::Remove { title } => commands::templates::remove(&config, &title),
        },
        Commands::Generate { constraints, yes } => {
            commands::generate::run(&config, day, constraints, yes).await
        }
        Commands::Export { dir } => commands::export::run(&config, day, dir),
    }
}

fn init_filter() -> EnvFilter {
    log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

/// `directives` (from `RUST_LOG`) when set and valid, otherwise warnings only.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn resolve_day(input: Option<&str>) -> Result<NaiveDate> {
    let today = chrono::Local::now().date_naive();
    commands::parse_day(input, today)
}
