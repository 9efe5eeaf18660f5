//! Loosely structured campaign note.
//!
//! # Responsibility
//! - Hold partially known facts before the dungeon master decides what the
//!   note describes.
//! - Expose the field-presence signals the conversion classifier reads.
//!
//! # Invariants
//! - All scalar attributes are optional; `None` means "not given".
//! - `locations` is the only multi-valued location link on any record
//!   besides location neighborhood. Order is insertion order.
//! - `end`, when set together with `start`, is never earlier than `start`.

use crate::model::ids::{CampaignId, CharacterId, LocationId, NoteId, OrganizationId};
use crate::model::vocab::{CharacterClass, Hostility};
use crate::model::{ensure_not_blank, ensure_time_range, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub campaign_id: CampaignId,
    pub title: String,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
    pub race: Option<String>,
    pub class: Option<CharacterClass>,
    pub level: Option<u32>,
    pub hostility: Option<Hostility>,
    pub locations: Vec<LocationId>,
    pub organizations: Vec<OrganizationId>,
    pub characters: Vec<CharacterId>,
    pub content: Option<String>,
}

impl Note {
    /// Creates a note with only a title set.
    pub fn new(campaign_id: CampaignId, title: impl Into<String>) -> Self {
        Self {
            id: NoteId::new(),
            campaign_id,
            title: title.into(),
            start: None,
            end: None,
            race: None,
            class: None,
            level: None,
            hostility: None,
            locations: Vec::new(),
            organizations: Vec::new(),
            characters: Vec::new(),
            content: None,
        }
    }

    /// Either end of a time range is set.
    pub fn has_time(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Race, class or level is set.
    pub fn has_character_traits(&self) -> bool {
        self.race.is_some() || self.class.is_some() || self.level.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("note title", &self.title)?;
        ensure_time_range(self.start, self.end)
    }
}
