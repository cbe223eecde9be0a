//! Error types for availability resolution.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The timezone name could not be resolved to IANA offset rules.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The requested date range is malformed or exceeds the allowed span.
    #[error("invalid date range {from}..={to}: {reason}")]
    InvalidRange {
        from: NaiveDate,
        to: NaiveDate,
        reason: String,
    },

    /// A schedule rule, break or override violates a structural invariant.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Slot duration must be strictly positive.
    #[error("slot duration must be positive, got {0} minutes")]
    InvalidDuration(i64),
}

pub type Result<T> = std::result::Result<T, EngineError>;
