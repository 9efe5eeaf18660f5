//! Campaign domain model.
//!
//! # Responsibility
//! - Define the records a dungeon master keeps per campaign.
//! - Own record-local invariants via `validate()`.
//!
//! # Invariants
//! - Every campaign record is identified by a stable typed UUID.
//! - Every campaign record carries the id of the campaign owning it.
//! - Names/titles are non-blank; time ranges are never inverted.

pub mod campaign;
pub mod character;
pub mod event;
pub mod ids;
pub mod location;
pub mod note;
pub mod organization;
pub mod vocab;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Point in time with minute precision as entered by users, stored as UTC.
pub type Timestamp = DateTime<Utc>;

/// Record-local invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
    #[error("end time {end} is earlier than start time {start}")]
    InvertedTimeRange { start: Timestamp, end: Timestamp },
    #[error("a {kind} cannot reference itself")]
    SelfReference { kind: &'static str },
    #[error("unknown {vocabulary} code `{value}`")]
    UnknownCode {
        vocabulary: &'static str,
        value: String,
    },
}

pub(crate) fn ensure_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

pub(crate) fn ensure_time_range(
    start: Option<Timestamp>,
    end: Option<Timestamp>,
) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ValidationError::InvertedTimeRange { start, end });
        }
    }
    Ok(())
}
