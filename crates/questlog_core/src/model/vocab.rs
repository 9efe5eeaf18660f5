//! Fixed vocabularies shared by every campaign record.
//!
//! Codes are the short strings persisted in SQLite and accepted from form
//! input (`F`, `N`, `Bd`, ...). Parsing is exact-match on the code after
//! trimming; labels are for display only.

use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Disposition of a location, organization or non-player character towards
/// the party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hostility {
    Friendly,
    #[default]
    Neutral,
    Hostile,
    Unknown,
}

impl Hostility {
    pub const ALL: [Hostility; 4] = [
        Hostility::Friendly,
        Hostility::Neutral,
        Hostility::Hostile,
        Hostility::Unknown,
    ];

    /// Persisted/form code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Friendly => "F",
            Self::Neutral => "N",
            Self::Hostile => "H",
            Self::Unknown => "?",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Friendly => "Friendly",
            Self::Neutral => "Neutral",
            Self::Hostile => "Hostile",
            Self::Unknown => "Unknown",
        }
    }

    pub fn from_code(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|hostility| hostility.code() == trimmed)
            .ok_or_else(|| ValidationError::UnknownCode {
                vocabulary: "hostility",
                value: trimmed.to_string(),
            })
    }
}

/// Character archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Artificer,
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Wizard,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 12] = [
        CharacterClass::Artificer,
        CharacterClass::Barbarian,
        CharacterClass::Bard,
        CharacterClass::Cleric,
        CharacterClass::Druid,
        CharacterClass::Fighter,
        CharacterClass::Monk,
        CharacterClass::Paladin,
        CharacterClass::Ranger,
        CharacterClass::Rogue,
        CharacterClass::Sorcerer,
        CharacterClass::Wizard,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Artificer => "A",
            Self::Barbarian => "B",
            Self::Bard => "Bd",
            Self::Cleric => "C",
            Self::Druid => "D",
            Self::Fighter => "F",
            Self::Monk => "M",
            Self::Paladin => "P",
            Self::Ranger => "R",
            Self::Rogue => "Rg",
            Self::Sorcerer => "S",
            Self::Wizard => "W",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Artificer => "Artificer",
            Self::Barbarian => "Barbarian",
            Self::Bard => "Bard",
            Self::Cleric => "Cleric",
            Self::Druid => "Druid",
            Self::Fighter => "Fighter",
            Self::Monk => "Monk",
            Self::Paladin => "Paladin",
            Self::Ranger => "Ranger",
            Self::Rogue => "Rogue",
            Self::Sorcerer => "Sorcerer",
            Self::Wizard => "Wizard",
        }
    }

    pub fn from_code(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.code() == trimmed)
            .ok_or_else(|| ValidationError::UnknownCode {
                vocabulary: "class",
                value: trimmed.to_string(),
            })
    }
}

/// Structured record type a note can be converted into.
///
/// Ordering follows declaration order and drives the display order of
/// eligible conversion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Location,
    Organization,
    Character,
    Event,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Location,
        EntityType::Organization,
        EntityType::Character,
        EntityType::Event,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::Organization => "Organization",
            Self::Character => "Character",
            Self::Event => "Event",
        }
    }

    /// Case-insensitive lookup by name. Returns `None` for anything else.
    pub fn from_name(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every kind of persisted record, used in lookup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Campaign,
    Location,
    Organization,
    Character,
    Event,
    Note,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Campaign => "campaign",
            Self::Location => "location",
            Self::Organization => "organization",
            Self::Character => "character",
            Self::Event => "event",
            Self::Note => "note",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EntityType> for RecordKind {
    fn from(value: EntityType) -> Self {
        match value {
            EntityType::Location => Self::Location,
            EntityType::Organization => Self::Organization,
            EntityType::Character => Self::Character,
            EntityType::Event => Self::Event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CharacterClass, EntityType, Hostility};

    #[test]
    fn hostility_codes_roundtrip() {
        for hostility in Hostility::ALL {
            assert_eq!(Hostility::from_code(hostility.code()).unwrap(), hostility);
        }
        assert!(Hostility::from_code("X").is_err());
    }

    #[test]
    fn class_codes_are_case_sensitive() {
        assert_eq!(CharacterClass::from_code("Bd").unwrap(), CharacterClass::Bard);
        assert_eq!(CharacterClass::from_code(" Rg ").unwrap(), CharacterClass::Rogue);
        assert!(CharacterClass::from_code("bd").is_err());
    }

    #[test]
    fn entity_type_names_are_case_insensitive() {
        assert_eq!(EntityType::from_name("event"), Some(EntityType::Event));
        assert_eq!(EntityType::from_name("Location"), Some(EntityType::Location));
        assert_eq!(EntityType::from_name("Campaign"), None);
    }
}
