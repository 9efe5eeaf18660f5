//! Location, organization, character and event use-case service.
//!
//! # Responsibility
//! - Turn raw form input into validated records with defaults applied.
//! - Check that every referenced record exists in the same campaign.
//!
//! # Invariants
//! - Reads and deletes of a record from another campaign behave as if the
//!   record did not exist.
//! - Character updates never switch the player/non-player variant.

use crate::model::character::{Character, CharacterKind, DEFAULT_LEVEL, DEFAULT_RACE};
use crate::model::event::Event;
use crate::model::ids::{CampaignId, CharacterId, EventId, LocationId, OrganizationId, UserId};
use crate::model::location::Location;
use crate::model::organization::Organization;
use crate::model::vocab::RecordKind;
use crate::repo::CampaignStore;
use crate::service::input::{
    non_blank, optional_text, parse_class, parse_hostility, parse_id, parse_level,
    parse_optional_time, parse_time, required, CharacterInput, EventInput, LocationInput,
    OrganizationInput,
};
use crate::service::{
    ensure_campaign, ensure_member, ensure_owned, resolve_ref, resolve_refs, ServiceError,
    ServiceResult,
};
use log::info;

/// Record service for the four structured campaign record types.
pub struct EntityService<S: CampaignStore> {
    store: S,
}

impl<S: CampaignStore> EntityService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // --- locations ---

    pub fn create_location(
        &self,
        campaign: CampaignId,
        input: &LocationInput,
    ) -> ServiceResult<Location> {
        ensure_campaign(&self.store, campaign)?;
        let mut location = Location::new(campaign, required("location name", &input.name)?);
        self.fill_location(&mut location, input)?;
        self.store.create_location(&location)?;
        log_write("location_create", campaign, location.id);
        self.get_location(campaign, location.id)
    }

    pub fn update_location(
        &self,
        campaign: CampaignId,
        id: LocationId,
        input: &LocationInput,
    ) -> ServiceResult<Location> {
        let mut location = self.get_location(campaign, id)?;
        location.name = required("location name", &input.name)?;
        self.fill_location(&mut location, input)?;
        self.store.update_location(&location)?;
        log_write("location_update", campaign, id);
        self.get_location(campaign, id)
    }

    pub fn get_location(&self, campaign: CampaignId, id: LocationId) -> ServiceResult<Location> {
        self.store
            .get_location(id)?
            .filter(|location| location.campaign_id == campaign)
            .ok_or_else(|| ServiceError::missing(RecordKind::Location, id))
    }

    pub fn list_locations(&self, campaign: CampaignId) -> ServiceResult<Vec<Location>> {
        ensure_campaign(&self.store, campaign)?;
        Ok(self.store.list_locations(campaign)?)
    }

    /// Deletes a location; records pointing at it lose that reference.
    pub fn delete_location(&self, campaign: CampaignId, id: LocationId) -> ServiceResult<()> {
        ensure_owned(&self.store, campaign, RecordKind::Location, id)?;
        self.store.delete_location(id)?;
        log_write("location_delete", campaign, id);
        Ok(())
    }

    fn fill_location(&self, location: &mut Location, input: &LocationInput) -> ServiceResult<()> {
        let campaign = location.campaign_id;
        location.hostility = parse_hostility(input.hostility.as_deref())?.unwrap_or_default();
        location.neighbors =
            resolve_refs(&self.store, campaign, RecordKind::Location, &input.neighbors)?;
        location.description = optional_text(input.description.as_deref());
        location.validate()?;
        Ok(())
    }

    // --- organizations ---

    pub fn create_organization(
        &self,
        campaign: CampaignId,
        input: &OrganizationInput,
    ) -> ServiceResult<Organization> {
        ensure_campaign(&self.store, campaign)?;
        let mut organization =
            Organization::new(campaign, required("organization name", &input.name)?);
        self.fill_organization(&mut organization, input)?;
        self.store.create_organization(&organization)?;
        log_write("organization_create", campaign, organization.id);
        self.get_organization(campaign, organization.id)
    }

    pub fn update_organization(
        &self,
        campaign: CampaignId,
        id: OrganizationId,
        input: &OrganizationInput,
    ) -> ServiceResult<Organization> {
        let mut organization = self.get_organization(campaign, id)?;
        organization.name = required("organization name", &input.name)?;
        self.fill_organization(&mut organization, input)?;
        self.store.update_organization(&organization)?;
        log_write("organization_update", campaign, id);
        self.get_organization(campaign, id)
    }

    pub fn get_organization(
        &self,
        campaign: CampaignId,
        id: OrganizationId,
    ) -> ServiceResult<Organization> {
        self.store
            .get_organization(id)?
            .filter(|organization| organization.campaign_id == campaign)
            .ok_or_else(|| ServiceError::missing(RecordKind::Organization, id))
    }

    pub fn list_organizations(&self, campaign: CampaignId) -> ServiceResult<Vec<Organization>> {
        ensure_campaign(&self.store, campaign)?;
        Ok(self.store.list_organizations(campaign)?)
    }

    pub fn delete_organization(
        &self,
        campaign: CampaignId,
        id: OrganizationId,
    ) -> ServiceResult<()> {
        ensure_owned(&self.store, campaign, RecordKind::Organization, id)?;
        self.store.delete_organization(id)?;
        log_write("organization_delete", campaign, id);
        Ok(())
    }

    fn fill_organization(
        &self,
        organization: &mut Organization,
        input: &OrganizationInput,
    ) -> ServiceResult<()> {
        let campaign = organization.campaign_id;
        organization.location = resolve_ref(
            &self.store,
            campaign,
            RecordKind::Location,
            input.location.as_deref(),
        )?;
        organization.hostility = parse_hostility(input.hostility.as_deref())?.unwrap_or_default();
        organization.related =
            resolve_refs(&self.store, campaign, RecordKind::Organization, &input.related)?;
        organization.description = optional_text(input.description.as_deref());
        organization.validate()?;
        Ok(())
    }

    // --- characters ---

    /// Creates a player or non-player character depending on
    /// `input.is_player_character`.
    pub fn create_character(
        &self,
        campaign: CampaignId,
        input: &CharacterInput,
    ) -> ServiceResult<Character> {
        ensure_campaign(&self.store, campaign)?;
        let mut character = Character::new(campaign, required("character name", &input.name)?);
        character.kind = if input.is_player_character {
            CharacterKind::Player { player: None }
        } else {
            CharacterKind::NonPlayer {
                hostility: Default::default(),
            }
        };
        self.fill_character(&mut character, input)?;
        self.store.create_character(&character)?;
        log_write("character_create", campaign, character.id);
        self.get_character(campaign, character.id)
    }

    /// Updates a character in place, keeping its variant.
    pub fn update_character(
        &self,
        campaign: CampaignId,
        id: CharacterId,
        input: &CharacterInput,
    ) -> ServiceResult<Character> {
        let mut character = self.get_character(campaign, id)?;
        character.name = required("character name", &input.name)?;
        self.fill_character(&mut character, input)?;
        self.store.update_character(&character)?;
        log_write("character_update", campaign, id);
        self.get_character(campaign, id)
    }

    pub fn get_character(&self, campaign: CampaignId, id: CharacterId) -> ServiceResult<Character> {
        self.store
            .get_character(id)?
            .filter(|character| character.campaign_id == campaign)
            .ok_or_else(|| ServiceError::missing(RecordKind::Character, id))
    }

    pub fn list_characters(&self, campaign: CampaignId) -> ServiceResult<Vec<Character>> {
        ensure_campaign(&self.store, campaign)?;
        Ok(self.store.list_characters(campaign)?)
    }

    pub fn delete_character(&self, campaign: CampaignId, id: CharacterId) -> ServiceResult<()> {
        ensure_owned(&self.store, campaign, RecordKind::Character, id)?;
        self.store.delete_character(id)?;
        log_write("character_delete", campaign, id);
        Ok(())
    }

    fn fill_character(
        &self,
        character: &mut Character,
        input: &CharacterInput,
    ) -> ServiceResult<()> {
        let campaign = character.campaign_id;
        character.race = non_blank(input.race.as_deref())
            .unwrap_or(DEFAULT_RACE)
            .to_string();
        character.class = parse_class(input.class.as_deref())?;
        character.level = parse_level(input.level.as_deref())?.unwrap_or(DEFAULT_LEVEL);
        character.origin = resolve_ref(
            &self.store,
            campaign,
            RecordKind::Location,
            input.origin.as_deref(),
        )?;
        character.organizations = resolve_refs(
            &self.store,
            campaign,
            RecordKind::Organization,
            &input.organizations,
        )?;
        character.related_characters = resolve_refs(
            &self.store,
            campaign,
            RecordKind::Character,
            &input.related_characters,
        )?;
        character.description = optional_text(input.description.as_deref());
        character.kind = match character.kind {
            CharacterKind::Player { .. } => CharacterKind::Player {
                player: self.resolve_player(campaign, input.player.as_deref())?,
            },
            CharacterKind::NonPlayer { .. } => CharacterKind::NonPlayer {
                hostility: parse_hostility(input.hostility.as_deref())?.unwrap_or_default(),
            },
        };
        character.validate()?;
        Ok(())
    }

    fn resolve_player(
        &self,
        campaign: CampaignId,
        raw: Option<&str>,
    ) -> ServiceResult<Option<UserId>> {
        let Some(raw) = non_blank(raw) else {
            return Ok(None);
        };
        let player: UserId = parse_id(RecordKind::User, raw)?;
        ensure_member(&self.store, campaign, player)?;
        Ok(Some(player))
    }

    // --- events ---

    pub fn create_event(&self, campaign: CampaignId, input: &EventInput) -> ServiceResult<Event> {
        ensure_campaign(&self.store, campaign)?;
        let title = required("event title", &input.title)?;
        let start = parse_time("start time", &required("event start time", &input.start)?)?;
        let mut event = Event::new(campaign, title, start);
        self.fill_event(&mut event, input)?;
        self.store.create_event(&event)?;
        log_write("event_create", campaign, event.id);
        self.get_event(campaign, event.id)
    }

    pub fn update_event(
        &self,
        campaign: CampaignId,
        id: EventId,
        input: &EventInput,
    ) -> ServiceResult<Event> {
        let mut event = self.get_event(campaign, id)?;
        event.title = required("event title", &input.title)?;
        event.start = parse_time("start time", &required("event start time", &input.start)?)?;
        self.fill_event(&mut event, input)?;
        self.store.update_event(&event)?;
        log_write("event_update", campaign, id);
        self.get_event(campaign, id)
    }

    pub fn get_event(&self, campaign: CampaignId, id: EventId) -> ServiceResult<Event> {
        self.store
            .get_event(id)?
            .filter(|event| event.campaign_id == campaign)
            .ok_or_else(|| ServiceError::missing(RecordKind::Event, id))
    }

    pub fn list_events(&self, campaign: CampaignId) -> ServiceResult<Vec<Event>> {
        ensure_campaign(&self.store, campaign)?;
        Ok(self.store.list_events(campaign)?)
    }

    pub fn delete_event(&self, campaign: CampaignId, id: EventId) -> ServiceResult<()> {
        ensure_owned(&self.store, campaign, RecordKind::Event, id)?;
        self.store.delete_event(id)?;
        log_write("event_delete", campaign, id);
        Ok(())
    }

    fn fill_event(&self, event: &mut Event, input: &EventInput) -> ServiceResult<()> {
        let campaign = event.campaign_id;
        event.end = parse_optional_time("end time", input.end.as_deref())?;
        event.location = resolve_ref(
            &self.store,
            campaign,
            RecordKind::Location,
            input.location.as_deref(),
        )?;
        event.organizations = resolve_refs(
            &self.store,
            campaign,
            RecordKind::Organization,
            &input.organizations,
        )?;
        event.characters =
            resolve_refs(&self.store, campaign, RecordKind::Character, &input.characters)?;
        event.description = optional_text(input.description.as_deref());
        event.validate()?;
        Ok(())
    }
}

fn log_write(event: &str, campaign: CampaignId, id: impl std::fmt::Display) {
    info!("event={event} module=service status=ok campaign={campaign} id={id}");
}
