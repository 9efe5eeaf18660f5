//! Note-to-entity conversion engine.
//!
//! # Responsibility
//! - Decide which structured record types a note may become (`classify`).
//! - Map a note into a new record of a chosen type (`plan_conversion`).
//!
//! # Invariants
//! - Both halves are pure: they read the note only and touch no storage.
//! - `plan_conversion` re-runs `classify` itself; a caller-supplied list of
//!   eligible types is never trusted.
//!
//! Persisting the planned record and retiring the note is the job of
//! `service::conversion_service`.

pub mod classify;
pub mod plan;

use crate::model::vocab::EntityType;
use thiserror::Error;

pub use classify::{classify, EligibleTypes};
pub use plan::{plan_conversion, CharacterOptions, ConversionPlan, ConversionRequest, ConvertedEntity};

/// Conversion failures detectable without storage access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("cannot convert note to `{requested}`; eligible types: {}", describe_types(eligible))]
    InvalidChoice {
        requested: String,
        eligible: Vec<EntityType>,
    },
    #[error("malformed conversion input: {0}")]
    MalformedInput(String),
}

/// Renders a type list for messages, e.g. `Location, Event` or `none`.
pub fn describe_types(types: &[EntityType]) -> String {
    if types.is_empty() {
        return "none".to_string();
    }
    types
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
