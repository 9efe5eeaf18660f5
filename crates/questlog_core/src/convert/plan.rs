//! Conversion executor: note fields → new record.
//!
//! # Invariants
//! - The chosen type must be in `classify(note)` at planning time.
//! - The new record gets a fresh id and the note's campaign.
//! - Note content becomes the record description.
//! - Single-location targets keep the note's first location only; the count
//!   of dropped locations is reported on the plan.

use crate::convert::classify::classify;
use crate::convert::ConversionError;
use crate::model::character::{Character, CharacterKind, DEFAULT_LEVEL, DEFAULT_RACE};
use crate::model::event::Event;
use crate::model::ids::{RecordId, UserId};
use crate::model::location::Location;
use crate::model::note::Note;
use crate::model::organization::Organization;
use crate::model::vocab::EntityType;
use serde::Serialize;
use uuid::Uuid;

/// Extra input used when the target is a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterOptions {
    pub is_player_character: bool,
    /// Controlling user; only read for player characters.
    pub player: Option<UserId>,
}

/// A user's conversion choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionRequest {
    pub target: EntityType,
    pub character: CharacterOptions,
}

impl ConversionRequest {
    pub fn new(target: EntityType) -> Self {
        Self {
            target,
            character: CharacterOptions::default(),
        }
    }

    /// Character target with the player variant.
    pub fn player_character(player: Option<UserId>) -> Self {
        Self {
            target: EntityType::Character,
            character: CharacterOptions {
                is_player_character: true,
                player,
            },
        }
    }

    /// Builds a request from raw form values.
    ///
    /// An unknown target name is an `InvalidChoice` (nothing can convert into
    /// it); an unparseable player id is `MalformedInput`. A blank player id
    /// means "no player assigned".
    pub fn parse(
        target: &str,
        is_player_character: bool,
        player: Option<&str>,
    ) -> Result<Self, ConversionError> {
        let kind = EntityType::from_name(target).ok_or_else(|| ConversionError::InvalidChoice {
            requested: target.trim().to_string(),
            eligible: Vec::new(),
        })?;

        let player = match player.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Some(value.parse::<UserId>().map_err(|_| {
                ConversionError::MalformedInput(format!("invalid player id `{value}`"))
            })?),
            None => None,
        };

        Ok(Self {
            target: kind,
            character: CharacterOptions {
                is_player_character,
                player,
            },
        })
    }
}

/// The record produced by a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "record", rename_all = "snake_case")]
pub enum ConvertedEntity {
    Location(Location),
    Organization(Organization),
    Character(Character),
    Event(Event),
}

impl ConvertedEntity {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Location(_) => EntityType::Location,
            Self::Organization(_) => EntityType::Organization,
            Self::Character(_) => EntityType::Character,
            Self::Event(_) => EntityType::Event,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Location(location) => location.id.uuid(),
            Self::Organization(organization) => organization.id.uuid(),
            Self::Character(character) => character.id.uuid(),
            Self::Event(event) => event.id.uuid(),
        }
    }

    /// Name, or title for events.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Location(location) => &location.name,
            Self::Organization(organization) => &organization.name,
            Self::Character(character) => &character.name,
            Self::Event(event) => &event.title,
        }
    }
}

/// A validated, not yet persisted conversion result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    pub entity: ConvertedEntity,
    /// Linked locations that the target type cannot hold.
    pub dropped_locations: usize,
}

/// Maps `note` into a new record of `request.target`.
///
/// # Errors
/// - `InvalidChoice` when the target is not eligible for the note as it is
///   now.
/// - `MalformedInput` when the mapped record fails its own validation.
pub fn plan_conversion(
    note: &Note,
    request: &ConversionRequest,
) -> Result<ConversionPlan, ConversionError> {
    let eligible = classify(note);
    if !eligible.contains(&request.target) {
        return Err(ConversionError::InvalidChoice {
            requested: request.target.as_str().to_string(),
            eligible: eligible.into_iter().collect(),
        });
    }

    let first_location = note.locations.first().copied();
    let extra_locations = note.locations.len().saturating_sub(1);

    let (entity, dropped_locations) = match request.target {
        EntityType::Location => {
            let mut location = Location::new(note.campaign_id, note.title.clone());
            location.hostility = note.hostility.unwrap_or_default();
            location.neighbors = note.locations.clone();
            location.description = note.content.clone();
            (ConvertedEntity::Location(location), 0)
        }
        EntityType::Organization => {
            let mut organization = Organization::new(note.campaign_id, note.title.clone());
            organization.location = first_location;
            organization.hostility = note.hostility.unwrap_or_default();
            organization.related = note.organizations.clone();
            organization.description = note.content.clone();
            (ConvertedEntity::Organization(organization), extra_locations)
        }
        EntityType::Character => {
            let mut character = Character::new(note.campaign_id, note.title.clone());
            character.race = note
                .race
                .as_deref()
                .map(str::trim)
                .filter(|race| !race.is_empty())
                .unwrap_or(DEFAULT_RACE)
                .to_string();
            character.class = note.class;
            character.level = note.level.unwrap_or(DEFAULT_LEVEL);
            character.origin = first_location;
            character.kind = if request.character.is_player_character {
                CharacterKind::Player {
                    player: request.character.player,
                }
            } else {
                CharacterKind::NonPlayer {
                    hostility: note.hostility.unwrap_or_default(),
                }
            };
            character.organizations = note.organizations.clone();
            character.related_characters = note.characters.clone();
            character.description = note.content.clone();
            (ConvertedEntity::Character(character), extra_locations)
        }
        EntityType::Event => {
            let start = note.start.or(note.end).ok_or_else(|| {
                ConversionError::MalformedInput("event conversion needs a start or end time".to_string())
            })?;
            let mut event = Event::new(note.campaign_id, note.title.clone(), start);
            event.end = note.end;
            event.location = first_location;
            event.organizations = note.organizations.clone();
            event.characters = note.characters.clone();
            event.description = note.content.clone();
            (ConvertedEntity::Event(event), extra_locations)
        }
    };

    let validation = match &entity {
        ConvertedEntity::Location(location) => location.validate(),
        ConvertedEntity::Organization(organization) => organization.validate(),
        ConvertedEntity::Character(character) => character.validate(),
        ConvertedEntity::Event(event) => event.validate(),
    };
    validation.map_err(|err| ConversionError::MalformedInput(err.to_string()))?;

    Ok(ConversionPlan {
        entity,
        dropped_locations,
    })
}

#[cfg(test)]
mod tests {
    use super::{plan_conversion, ConversionRequest, ConvertedEntity};
    use crate::convert::ConversionError;
    use crate::model::character::CharacterKind;
    use crate::model::ids::{CampaignId, LocationId, OrganizationId, UserId};
    use crate::model::note::Note;
    use crate::model::vocab::{EntityType, Hostility};
    use chrono::{TimeZone, Utc};

    #[test]
    fn organization_keeps_first_location_and_counts_the_rest() {
        let mut note = Note::new(CampaignId::new(), "Thieves' Guild");
        let first = LocationId::new();
        note.hostility = Some(Hostility::Hostile);
        note.organizations = vec![OrganizationId::new()];
        // One location keeps Organization eligible.
        note.locations = vec![first];

        let plan = plan_conversion(&note, &ConversionRequest::new(EntityType::Organization))
            .expect("organization should be eligible");
        let ConvertedEntity::Organization(organization) = plan.entity else {
            panic!("expected organization");
        };
        assert_eq!(organization.location, Some(first));
        assert_eq!(organization.hostility, Hostility::Hostile);
        assert_eq!(organization.related, note.organizations);
        assert_eq!(plan.dropped_locations, 0);
    }

    #[test]
    fn event_falls_back_to_end_time_for_start() {
        let end = Utc.with_ymd_and_hms(1402, 5, 9, 20, 30, 0).unwrap();
        let mut note = Note::new(CampaignId::new(), "Eclipse");
        note.end = Some(end);
        note.locations = vec![LocationId::new(), LocationId::new()];

        let plan = plan_conversion(&note, &ConversionRequest::new(EntityType::Event)).unwrap();
        let ConvertedEntity::Event(event) = plan.entity else {
            panic!("expected event");
        };
        assert_eq!(event.start, end);
        assert_eq!(event.end, Some(end));
        assert_eq!(event.location, note.locations.first().copied());
        assert_eq!(plan.dropped_locations, 1);
    }

    #[test]
    fn player_character_ignores_note_hostility() {
        let player = UserId::new();
        let mut note = Note::new(CampaignId::new(), "Aria");
        note.level = Some(3);

        let plan = plan_conversion(&note, &ConversionRequest::player_character(Some(player)))
            .unwrap();
        let ConvertedEntity::Character(character) = plan.entity else {
            panic!("expected character");
        };
        assert_eq!(character.kind, CharacterKind::Player { player: Some(player) });
        assert_eq!(character.level, 3);
        assert_eq!(character.race, "Human");
    }

    #[test]
    fn ineligible_target_is_rejected_with_eligible_list() {
        let note = Note::new(CampaignId::new(), "Rumor");
        let err = plan_conversion(&note, &ConversionRequest::new(EntityType::Event)).unwrap_err();
        assert_eq!(
            err,
            ConversionError::InvalidChoice {
                requested: "Event".to_string(),
                eligible: vec![
                    EntityType::Location,
                    EntityType::Organization,
                    EntityType::Character
                ],
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_target_and_bad_player() {
        assert!(matches!(
            ConversionRequest::parse("Dragon", false, None),
            Err(ConversionError::InvalidChoice { .. })
        ));
        assert!(matches!(
            ConversionRequest::parse("character", true, Some("not-a-uuid")),
            Err(ConversionError::MalformedInput(_))
        ));
        let request = ConversionRequest::parse("character", true, Some("  ")).unwrap();
        assert_eq!(request.target, EntityType::Character);
        assert_eq!(request.character.player, None);
    }
}
