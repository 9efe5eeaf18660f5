//! Note conversion use-case service.
//!
//! # Responsibility
//! - Preview which record types a stored note may become.
//! - Commit a conversion: create the planned record and delete the note in
//!   one write transaction.
//!
//! # Invariants
//! - Commit re-reads the note and re-classifies it inside the transaction;
//!   a preview result is never trusted.
//! - On any error the transaction is dropped and storage is unchanged.
//! - A committed conversion leaves exactly one new record and no note.

use crate::convert::{classify, plan_conversion, ConversionRequest, ConvertedEntity};
use crate::model::ids::{CampaignId, NoteId, RecordId};
use crate::model::note::Note;
use crate::model::vocab::{EntityType, RecordKind};
use crate::repo::{CampaignStore, SqliteStore};
use crate::service::{ensure_member, ensure_owned, ServiceError, ServiceResult};
use log::{error, info, warn};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use std::time::Instant;

/// Advisory list of conversion targets for one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionPreview {
    pub note_id: NoteId,
    /// Sorted in `EntityType` order. Empty means the note cannot convert.
    pub eligible: Vec<EntityType>,
}

/// Conversion entry point over a SQLite connection.
pub struct ConversionService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> ConversionService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    pub fn preview(&self, campaign: CampaignId, note_id: NoteId) -> ServiceResult<ConversionPreview> {
        let store = SqliteStore::try_new(&*self.conn)?;
        let note = load_note(&store, campaign, note_id)?;
        Ok(ConversionPreview {
            note_id,
            eligible: classify(&note).into_iter().collect(),
        })
    }

    /// Converts the note and returns the created record.
    ///
    /// Runs under `BEGIN IMMEDIATE`, so the eligibility check and both writes
    /// see the same state.
    pub fn commit(
        &mut self,
        campaign: CampaignId,
        note_id: NoteId,
        request: &ConversionRequest,
    ) -> ServiceResult<ConvertedEntity> {
        let started_at = Instant::now();
        info!(
            "event=note_convert module=service status=start campaign={campaign} note={note_id} target={}",
            request.target
        );

        let result = self.commit_in_transaction(campaign, note_id, request);
        match &result {
            Ok(entity) => info!(
                "event=note_convert module=service status=ok campaign={campaign} note={note_id} target={} entity={} duration_ms={}",
                entity.entity_type(),
                entity.id(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=note_convert module=service status=error campaign={campaign} note={note_id} target={} duration_ms={} error_code={}",
                request.target,
                started_at.elapsed().as_millis(),
                err.code()
            ),
        }
        result
    }

    fn commit_in_transaction(
        &mut self,
        campaign: CampaignId,
        note_id: NoteId,
        request: &ConversionRequest,
    ) -> ServiceResult<ConvertedEntity> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let entity = {
            let store = SqliteStore::try_new(&tx)?;
            execute_conversion(&store, campaign, note_id, request)?
        };
        tx.commit()?;
        Ok(entity)
    }
}

/// Plans and persists one conversion against `store`.
///
/// Creates the new record first and deletes the note second. Callers that
/// need atomicity run this inside a transaction, as
/// [`ConversionService::commit`] does.
///
/// # Errors
/// - `ReferenceNotFound` when the note, a linked record or the player is
///   missing from `campaign`.
/// - `InvalidChoice` when the target is not eligible for the note.
/// - `MalformedInput` when the mapped record fails validation.
pub fn execute_conversion<S: CampaignStore + ?Sized>(
    store: &S,
    campaign: CampaignId,
    note_id: NoteId,
    request: &ConversionRequest,
) -> ServiceResult<ConvertedEntity> {
    let note = load_note(store, campaign, note_id)?;
    let plan = plan_conversion(&note, request)?;
    ensure_links_owned(store, campaign, &plan.entity)?;

    match &plan.entity {
        ConvertedEntity::Location(location) => {
            store.create_location(location)?;
        }
        ConvertedEntity::Organization(organization) => {
            store.create_organization(organization)?;
        }
        ConvertedEntity::Character(character) => {
            if let Some(player) = character.player() {
                ensure_member(store, campaign, player)?;
            }
            store.create_character(character)?;
        }
        ConvertedEntity::Event(event) => {
            store.create_event(event)?;
        }
    }
    store.delete_note(note_id)?;

    if plan.dropped_locations > 0 {
        warn!(
            "event=note_convert_drop_locations module=service status=ok note={note_id} target={} dropped={}",
            plan.entity.entity_type(),
            plan.dropped_locations
        );
    }
    Ok(plan.entity)
}

fn load_note<S: CampaignStore + ?Sized>(
    store: &S,
    campaign: CampaignId,
    note_id: NoteId,
) -> ServiceResult<Note> {
    store
        .get_note(note_id)?
        .filter(|note| note.campaign_id == campaign)
        .ok_or_else(|| ServiceError::missing(RecordKind::Note, note_id))
}

fn ensure_links_owned<S: CampaignStore + ?Sized>(
    store: &S,
    campaign: CampaignId,
    entity: &ConvertedEntity,
) -> ServiceResult<()> {
    let (locations, organizations, characters) = match entity {
        ConvertedEntity::Location(location) => (location.neighbors.clone(), Vec::new(), Vec::new()),
        ConvertedEntity::Organization(organization) => (
            organization.location.into_iter().collect(),
            organization.related.clone(),
            Vec::new(),
        ),
        ConvertedEntity::Character(character) => (
            character.origin.into_iter().collect(),
            character.organizations.clone(),
            character.related_characters.clone(),
        ),
        ConvertedEntity::Event(event) => (
            event.location.into_iter().collect(),
            event.organizations.clone(),
            event.characters.clone(),
        ),
    };
    ensure_all_owned(store, campaign, RecordKind::Location, &locations)?;
    ensure_all_owned(store, campaign, RecordKind::Organization, &organizations)?;
    ensure_all_owned(store, campaign, RecordKind::Character, &characters)
}

fn ensure_all_owned<S, T>(
    store: &S,
    campaign: CampaignId,
    kind: RecordKind,
    ids: &[T],
) -> ServiceResult<()>
where
    S: CampaignStore + ?Sized,
    T: RecordId,
{
    ids.iter()
        .try_for_each(|id| ensure_owned(store, campaign, kind, *id))
}
