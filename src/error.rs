//! Error types for the analytics crate.
//!
//! The aggregation engine itself never fails: empty inputs produce empty
//! tables. Errors only arise at the edges, when raw files are ingested or a
//! caller hands over an inconsistent date range.

use std::path::PathBuf;

use chrono::NaiveDate;

/// Primary error type for ingestion, filtering and export.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// A file could not be opened, read or written.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer rejected a row (bad quoting, missing column, bad number).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A field was present but could not be parsed into its typed form.
    /// `line` counts data rows from 1, not counting the header.
    #[error("parse error on line {line}, field `{field}`: {message}")]
    Parse {
        line: u64,
        field: &'static str,
        message: String,
    },

    /// The requested date range ends before it starts.
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// The JSON summary could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalyticsError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error was raised while turning raw text into records.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, AnalyticsError::Parse { .. } | AnalyticsError::Csv(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
