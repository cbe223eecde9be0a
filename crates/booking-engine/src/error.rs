//! Error types for slot/booking lifecycle operations.

use availability_engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// A failure in the pure resolution pipeline (timezone, range, schedule).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The referenced schedule, slot or booking does not exist (or is not
    /// owned by the claimed worker/business).
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A state-machine transition was attempted from the wrong state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A caller-supplied value failed validation before any work began.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A concurrent writer changed a record between read and commit.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A structural invariant did not hold in stored data. Never expected
    /// under correct operation; surfaced hard rather than silently repaired.
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),
}

impl BookingError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
