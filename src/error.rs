use chrono::NaiveDate;
use thiserror::Error;

/// Configuration problems that stop a run before any request goes out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown competition '{key}' (known: {known})")]
    UnknownCompetition { key: String, known: String },

    #[error("invalid date '{value}' for {field} (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid number '{value}' for {field}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown connection mode '{0}' (expected direct or proxy)")]
    UnknownConnectionMode(String),

    #[error("proxy connection mode requires RATINGS_PROXY_URL")]
    MissingProxyUrl,
}
