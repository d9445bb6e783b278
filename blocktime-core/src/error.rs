//! Error types for blocktime.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::event::EventId;

/// Errors that can occur in blocktime operations.
///
/// Geometry and placement never produce these: out-of-range gesture input is
/// clamped instead.
#[derive(Error, Debug)]
pub enum BlockTimeError {
    #[error("An event with id {0} already exists")]
    DuplicateId(EventId),

    #[error("Event not found: {0}")]
    NotFound(EventId),

    #[error("Please provide a valid name for your block.")]
    InvalidTitle,

    #[error("The start time must be before the end time ({start} >= {end}).")]
    InvalidTimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Please select a duration greater than 0.")]
    InvalidDuration,

    #[error("Invalid color encoding: '{0}'")]
    InvalidColor(String),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("Could not parse schedule from response: {0}")]
    InvalidJson(String),

    #[error("Invalid gesture transition: {0}")]
    Gesture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for blocktime operations.
pub type BlockTimeResult<T> = Result<T, BlockTimeError>;
