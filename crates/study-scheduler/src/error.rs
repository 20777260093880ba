//! Error types for scheduling operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// An interval whose start is not strictly before its end.
    #[error("Invalid interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid scheduling policy: {0}")]
    InvalidPolicy(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
