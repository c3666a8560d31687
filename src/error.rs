//! Error types for the heatmap pipeline

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building a calendar grid
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid observation for {date}: count {count} is negative")]
    NegativeCount { date: NaiveDate, count: i64 },

    #[error("Duplicate observation for {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("Invalid date '{value}' (expected YYYY-MM-DD): {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Date arithmetic out of range near {date}")]
    DateOverflow { date: NaiveDate },

    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GridResult<T> = Result<T, GridError>;
