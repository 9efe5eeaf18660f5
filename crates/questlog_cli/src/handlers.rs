use crate::cli::{
    CampaignAction, CampaignScope, CharacterAction, CharacterCommand, CharacterFields,
    EventAction, EventCommand, EventFields, LocationAction, LocationCommand, LocationFields,
    NoteAction, NoteCommand, NoteFields, OrganizationAction, OrganizationCommand,
    OrganizationFields, UserAction,
};
use anyhow::{anyhow, Context as _, Result};
use log::info;
use questlog_core::{
    open_db, CampaignId, CampaignService, CharacterInput, ConversionRequest, ConversionService,
    EntityService, EventInput, LocationInput, NoteInput, NoteService, OrganizationInput,
    ServiceError, SqliteStore,
};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// Open database plus output mode shared by every handler.
pub struct Context {
    conn: Connection,
    json: bool,
}

impl Context {
    pub fn open(db: &Path, json: bool) -> Result<Self> {
        let conn = open_db(db).with_context(|| format!("failed to open {}", db.display()))?;
        Ok(Self { conn, json })
    }

    fn store(&self) -> Result<SqliteStore<'_>> {
        Ok(SqliteStore::try_new(&self.conn)?)
    }

    /// Prints `value` as JSON, or the `human` rendering of it.
    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", human(value));
        }
        Ok(())
    }

    /// Full records print as pretty JSON in both modes.
    fn show<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn deleted(&self, kind: &str, id: impl ToString) -> Result<()> {
        let id = id.to_string();
        self.emit(&serde_json::json!({ "deleted": kind, "id": id }), |_| {
            format!("Deleted {kind} {id}")
        })
    }
}

fn campaign_of(scope: CampaignScope) -> Result<CampaignId> {
    scope
        .campaign
        .ok_or_else(|| anyhow!("missing --campaign (or QUESTLOG_CAMPAIGN)"))
}

fn list_lines<T>(items: &[T], line: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items.iter().map(line).collect::<Vec<_>>().join("\n")
}

pub fn handle_user(ctx: &Context, action: UserAction) -> Result<()> {
    let campaigns = CampaignService::new(ctx.store()?);
    match action {
        UserAction::Add { username } => {
            let user = campaigns.register_user(&username)?;
            ctx.emit(&user, |user| format!("Created user {} - {}", user.id, user.username))
        }
    }
}

pub fn handle_campaign(ctx: &Context, action: CampaignAction) -> Result<()> {
    let campaigns = CampaignService::new(ctx.store()?);
    match action {
        CampaignAction::Add {
            name,
            dm,
            description,
            public,
        } => {
            let campaign =
                campaigns.create_campaign(dm, &name, description.as_deref(), public)?;
            ctx.emit(&campaign, |campaign| {
                format!("Created campaign {} - {}", campaign.id, campaign.name)
            })
        }
        CampaignAction::List { user } => {
            let list = campaigns.list_campaigns(user)?;
            ctx.emit(&list, |list| {
                list_lines(list, |campaign| format!("{}  {}", campaign.id, campaign.name))
            })
        }
        CampaignAction::Show { id } => {
            let campaign = campaigns.get_campaign(id)?;
            let members = campaigns.list_members(id)?;
            ctx.show(&serde_json::json!({ "campaign": campaign, "members": members }))
        }
        CampaignAction::Member { id, user } => {
            let campaign = campaigns.approve_member(id, user)?;
            ctx.emit(&campaign, |campaign| {
                format!("Approved {user} for campaign {}", campaign.name)
            })
        }
        CampaignAction::Delete { id } => {
            campaigns.delete_campaign(id)?;
            ctx.deleted("campaign", id)
        }
    }
}

impl From<LocationFields> for LocationInput {
    fn from(fields: LocationFields) -> Self {
        Self {
            name: fields.name,
            hostility: fields.hostility,
            neighbors: fields.neighbors,
            description: fields.description,
        }
    }
}

pub fn handle_location(ctx: &Context, command: LocationCommand) -> Result<()> {
    let campaign = campaign_of(command.scope)?;
    let entities = EntityService::new(ctx.store()?);
    match command.action {
        LocationAction::Add(fields) => {
            let location = entities.create_location(campaign, &fields.into())?;
            ctx.emit(&location, |location| {
                format!("Created location {} - {}", location.id, location.name)
            })
        }
        LocationAction::Edit { id, fields } => {
            let location = entities.update_location(campaign, id, &fields.into())?;
            ctx.emit(&location, |location| {
                format!("Updated location {} - {}", location.id, location.name)
            })
        }
        LocationAction::List => {
            let list = entities.list_locations(campaign)?;
            ctx.emit(&list, |list| {
                list_lines(list, |location| {
                    format!("{}  {} [{}]", location.id, location.name, location.hostility.label())
                })
            })
        }
        LocationAction::Show { id } => ctx.show(&entities.get_location(campaign, id)?),
        LocationAction::Delete { id } => {
            entities.delete_location(campaign, id)?;
            ctx.deleted("location", id)
        }
    }
}

impl From<OrganizationFields> for OrganizationInput {
    fn from(fields: OrganizationFields) -> Self {
        Self {
            name: fields.name,
            location: fields.location,
            hostility: fields.hostility,
            related: fields.related,
            description: fields.description,
        }
    }
}

pub fn handle_organization(ctx: &Context, command: OrganizationCommand) -> Result<()> {
    let campaign = campaign_of(command.scope)?;
    let entities = EntityService::new(ctx.store()?);
    match command.action {
        OrganizationAction::Add(fields) => {
            let organization = entities.create_organization(campaign, &fields.into())?;
            ctx.emit(&organization, |organization| {
                format!("Created organization {} - {}", organization.id, organization.name)
            })
        }
        OrganizationAction::Edit { id, fields } => {
            let organization = entities.update_organization(campaign, id, &fields.into())?;
            ctx.emit(&organization, |organization| {
                format!("Updated organization {} - {}", organization.id, organization.name)
            })
        }
        OrganizationAction::List => {
            let list = entities.list_organizations(campaign)?;
            ctx.emit(&list, |list| {
                list_lines(list, |organization| {
                    format!(
                        "{}  {} [{}]",
                        organization.id,
                        organization.name,
                        organization.hostility.label()
                    )
                })
            })
        }
        OrganizationAction::Show { id } => ctx.show(&entities.get_organization(campaign, id)?),
        OrganizationAction::Delete { id } => {
            entities.delete_organization(campaign, id)?;
            ctx.deleted("organization", id)
        }
    }
}

impl From<CharacterFields> for CharacterInput {
    fn from(fields: CharacterFields) -> Self {
        Self {
            name: fields.name,
            race: fields.race,
            class: fields.class,
            level: fields.level,
            origin: fields.origin,
            organizations: fields.organizations,
            related_characters: fields.related_characters,
            description: fields.description,
            is_player_character: fields.player_character,
            player: fields.player,
            hostility: fields.hostility,
        }
    }
}

pub fn handle_character(ctx: &Context, command: CharacterCommand) -> Result<()> {
    let campaign = campaign_of(command.scope)?;
    let entities = EntityService::new(ctx.store()?);
    match command.action {
        CharacterAction::Add(fields) => {
            let character = entities.create_character(campaign, &fields.into())?;
            ctx.emit(&character, |character| {
                format!("Created character {} - {}", character.id, character.name)
            })
        }
        CharacterAction::Edit { id, fields } => {
            let character = entities.update_character(campaign, id, &fields.into())?;
            ctx.emit(&character, |character| {
                format!("Updated character {} - {}", character.id, character.name)
            })
        }
        CharacterAction::List => {
            let list = entities.list_characters(campaign)?;
            ctx.emit(&list, |list| {
                list_lines(list, |character| {
                    let kind = if character.is_player_character() {
                        "PC"
                    } else {
                        "NPC"
                    };
                    format!(
                        "{}  {} ({} {}, level {})",
                        character.id, character.name, kind, character.race, character.level
                    )
                })
            })
        }
        CharacterAction::Show { id } => ctx.show(&entities.get_character(campaign, id)?),
        CharacterAction::Delete { id } => {
            entities.delete_character(campaign, id)?;
            ctx.deleted("character", id)
        }
    }
}

impl From<EventFields> for EventInput {
    fn from(fields: EventFields) -> Self {
        Self {
            title: fields.title,
            start: fields.start,
            end: fields.end,
            location: fields.location,
            organizations: fields.organizations,
            characters: fields.characters,
            description: fields.description,
        }
    }
}

pub fn handle_event(ctx: &Context, command: EventCommand) -> Result<()> {
    let campaign = campaign_of(command.scope)?;
    let entities = EntityService::new(ctx.store()?);
    match command.action {
        EventAction::Add(fields) => {
            let event = entities.create_event(campaign, &fields.into())?;
            ctx.emit(&event, |event| format!("Created event {} - {}", event.id, event.title))
        }
        EventAction::Edit { id, fields } => {
            let event = entities.update_event(campaign, id, &fields.into())?;
            ctx.emit(&event, |event| format!("Updated event {} - {}", event.id, event.title))
        }
        EventAction::List => {
            let list = entities.list_events(campaign)?;
            ctx.emit(&list, |list| {
                list_lines(list, |event| {
                    format!(
                        "{}  {}  {}",
                        event.id,
                        event.start.format(questlog_core::TIME_FORMAT),
                        event.title
                    )
                })
            })
        }
        EventAction::Show { id } => ctx.show(&entities.get_event(campaign, id)?),
        EventAction::Delete { id } => {
            entities.delete_event(campaign, id)?;
            ctx.deleted("event", id)
        }
    }
}

impl From<NoteFields> for NoteInput {
    fn from(fields: NoteFields) -> Self {
        Self {
            title: fields.title,
            start: fields.start,
            end: fields.end,
            race: fields.race,
            class: fields.class,
            level: fields.level,
            hostility: fields.hostility,
            locations: fields.locations,
            organizations: fields.organizations,
            characters: fields.characters,
            content: fields.content,
        }
    }
}

pub fn handle_note(ctx: &mut Context, command: NoteCommand) -> Result<()> {
    let campaign = campaign_of(command.scope)?;
    match command.action {
        NoteAction::Add(fields) => {
            let note = NoteService::new(ctx.store()?).create_note(campaign, &fields.into())?;
            ctx.emit(&note, |note| format!("Created note {} - {}", note.id, note.title))
        }
        NoteAction::Edit { id, fields } => {
            let note = NoteService::new(ctx.store()?).update_note(campaign, id, &fields.into())?;
            ctx.emit(&note, |note| format!("Updated note {} - {}", note.id, note.title))
        }
        NoteAction::List => {
            let list = NoteService::new(ctx.store()?).list_notes(campaign)?;
            ctx.emit(&list, |list| {
                list_lines(list, |note| format!("{}  {}", note.id, note.title))
            })
        }
        NoteAction::Show { id } => ctx.show(&NoteService::new(ctx.store()?).get_note(campaign, id)?),
        NoteAction::Delete { id } => {
            NoteService::new(ctx.store()?).delete_note(campaign, id)?;
            ctx.deleted("note", id)
        }
        NoteAction::Preview { id } => {
            let preview = ConversionService::new(&mut ctx.conn).preview(campaign, id)?;
            ctx.emit(&preview, |preview| {
                format!(
                    "Note {} can become: {}",
                    preview.note_id,
                    questlog_core::convert::describe_types(&preview.eligible)
                )
            })
        }
        NoteAction::Convert {
            id,
            target,
            player_character,
            player,
        } => {
            let request = ConversionRequest::parse(&target, player_character, player.as_deref())
                .map_err(ServiceError::from)?;
            let entity = ConversionService::new(&mut ctx.conn).commit(campaign, id, &request)?;
            info!(
                "event=cli_convert module=cli status=ok note={id} target={}",
                entity.entity_type()
            );
            ctx.emit(&entity, |entity| {
                format!(
                    "Converted note {id} into {} {} - {}",
                    entity.entity_type(),
                    entity.id(),
                    entity.display_name()
                )
            })
        }
    }
}
