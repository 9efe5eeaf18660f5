//! Character record and its player/non-player variant.
//!
//! # Invariants
//! - A character is exactly one of the two variants; only player characters
//!   carry a player reference and only non-player characters carry hostility.
//! - `related_characters` is symmetric.

use crate::model::ids::{CampaignId, CharacterId, LocationId, OrganizationId, UserId};
use crate::model::vocab::{CharacterClass, Hostility};
use crate::model::{ensure_not_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Race assigned when none is given.
pub const DEFAULT_RACE: &str = "Human";
/// Level assigned when none is given.
pub const DEFAULT_LEVEL: u32 = 0;

/// Variant-specific payload of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CharacterKind {
    /// Controlled by a user. The player may be left unassigned.
    Player { player: Option<UserId> },
    /// Controlled by the dungeon master.
    NonPlayer { hostility: Hostility },
}

impl Default for CharacterKind {
    fn default() -> Self {
        Self::NonPlayer {
            hostility: Hostility::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub campaign_id: CampaignId,
    pub name: String,
    pub race: String,
    pub class: Option<CharacterClass>,
    pub level: u32,
    /// Where the character comes from.
    pub origin: Option<LocationId>,
    pub kind: CharacterKind,
    pub organizations: Vec<OrganizationId>,
    pub related_characters: Vec<CharacterId>,
    pub description: Option<String>,
}

impl Character {
    /// Creates a non-player character with default race, level and hostility.
    pub fn new(campaign_id: CampaignId, name: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            campaign_id,
            name: name.into(),
            race: DEFAULT_RACE.to_string(),
            class: None,
            level: DEFAULT_LEVEL,
            origin: None,
            kind: CharacterKind::default(),
            organizations: Vec::new(),
            related_characters: Vec::new(),
            description: None,
        }
    }

    pub fn is_player_character(&self) -> bool {
        matches!(self.kind, CharacterKind::Player { .. })
    }

    pub fn player(&self) -> Option<UserId> {
        match self.kind {
            CharacterKind::Player { player } => player,
            CharacterKind::NonPlayer { .. } => None,
        }
    }

    pub fn hostility(&self) -> Option<Hostility> {
        match self.kind {
            CharacterKind::Player { .. } => None,
            CharacterKind::NonPlayer { hostility } => Some(hostility),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("character name", &self.name)?;
        ensure_not_blank("character race", &self.race)?;
        if self.related_characters.contains(&self.id) {
            return Err(ValidationError::SelfReference { kind: "character" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Character, CharacterKind, DEFAULT_RACE};
    use crate::model::ids::{CampaignId, UserId};
    use crate::model::vocab::Hostility;

    #[test]
    fn new_character_is_neutral_npc_with_defaults() {
        let character = Character::new(CampaignId::new(), "Grak");
        assert_eq!(character.race, DEFAULT_RACE);
        assert_eq!(character.level, 0);
        assert!(!character.is_player_character());
        assert_eq!(character.hostility(), Some(Hostility::Neutral));
        assert_eq!(character.player(), None);
    }

    #[test]
    fn player_variant_has_no_hostility() {
        let player = UserId::new();
        let mut character = Character::new(CampaignId::new(), "Aria");
        character.kind = CharacterKind::Player {
            player: Some(player),
        };
        assert!(character.is_player_character());
        assert_eq!(character.player(), Some(player));
        assert_eq!(character.hostility(), None);
    }

    #[test]
    fn validate_rejects_self_relation() {
        let mut character = Character::new(CampaignId::new(), "Mirror");
        character.related_characters.push(character.id);
        assert!(character.validate().is_err());
    }
}
