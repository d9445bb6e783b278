//! Core types for Block Time, a single-day planner.
//!
//! This crate holds everything that does not need a terminal or a network:
//! - `geometry` and `placement` map times to positions on the day column
//! - `gesture` tracks a drag from start to commit
//! - `schedule` and `session` keep the day's events and write them through a store
//! - `generator` builds prompts and parses generated schedules
//! - `export` writes events to external calendars

pub mod color;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod generator;
pub mod geometry;
pub mod gesture;
pub mod placement;
pub mod schedule;
pub mod session;
pub mod store;
pub mod template;
pub mod time_of_day;

pub use color::Color;
pub use config::BlockTimeConfig;
pub use error::{BlockTimeError, BlockTimeResult};
pub use event::{Event, EventId};
pub use geometry::TimelineGeometry;
pub use placement::{EventPlacement, PlacementConfig, Rect};
pub use schedule::ScheduleModel;
pub use session::DaySession;
pub use template::{EventTemplate, TemplateCatalog};
pub use time_of_day::{TimeOfDay, TimeSpan};
