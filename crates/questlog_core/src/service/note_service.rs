//! Note use-case service.
//!
//! # Responsibility
//! - Provide campaign-scoped create/update/get/list/delete APIs for notes.
//! - Parse raw note input; every field except the title may be left blank.
//!
//! # Invariants
//! - `update_note` uses full replacement semantics: blank fields clear.
//! - Note list is always sorted by `updated_at DESC, uuid ASC`.
//! - Linked records must belong to the note's campaign.

use crate::model::ids::{CampaignId, NoteId};
use crate::model::note::Note;
use crate::model::vocab::RecordKind;
use crate::repo::{NoteRepository, ReferenceLookup};
use crate::service::input::{
    non_blank, optional_text, parse_class, parse_hostility, parse_level, parse_optional_time,
    required, NoteInput,
};
use crate::service::{ensure_campaign, ensure_owned, resolve_refs, ServiceError, ServiceResult};
use log::info;

/// Note service facade over repository implementations.
pub struct NoteService<S: NoteRepository + ReferenceLookup> {
    store: S,
}

impl<S: NoteRepository + ReferenceLookup> NoteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_note(&self, campaign: CampaignId, input: &NoteInput) -> ServiceResult<Note> {
        ensure_campaign(&self.store, campaign)?;
        let mut note = Note::new(campaign, required("note title", &input.title)?);
        self.fill_note(&mut note, input)?;
        self.store.create_note(&note)?;
        info!(
            "event=note_create module=service status=ok campaign={campaign} note={}",
            note.id
        );
        self.get_note(campaign, note.id)
    }

    /// Replaces every field of the note with `input`.
    pub fn update_note(
        &self,
        campaign: CampaignId,
        id: NoteId,
        input: &NoteInput,
    ) -> ServiceResult<Note> {
        let mut note = self.get_note(campaign, id)?;
        note.title = required("note title", &input.title)?;
        self.fill_note(&mut note, input)?;
        self.store.update_note(&note)?;
        info!("event=note_update module=service status=ok campaign={campaign} note={id}");
        self.get_note(campaign, id)
    }

    pub fn get_note(&self, campaign: CampaignId, id: NoteId) -> ServiceResult<Note> {
        self.store
            .get_note(id)?
            .filter(|note| note.campaign_id == campaign)
            .ok_or_else(|| ServiceError::missing(RecordKind::Note, id))
    }

    pub fn list_notes(&self, campaign: CampaignId) -> ServiceResult<Vec<Note>> {
        ensure_campaign(&self.store, campaign)?;
        Ok(self.store.list_notes(campaign)?)
    }

    pub fn delete_note(&self, campaign: CampaignId, id: NoteId) -> ServiceResult<()> {
        ensure_owned(&self.store, campaign, RecordKind::Note, id)?;
        self.store.delete_note(id)?;
        info!("event=note_delete module=service status=ok campaign={campaign} note={id}");
        Ok(())
    }

    fn fill_note(&self, note: &mut Note, input: &NoteInput) -> ServiceResult<()> {
        let campaign = note.campaign_id;
        note.start = parse_optional_time("start time", input.start.as_deref())?;
        note.end = parse_optional_time("end time", input.end.as_deref())?;
        note.race = non_blank(input.race.as_deref()).map(str::to_string);
        note.class = parse_class(input.class.as_deref())?;
        note.level = parse_level(input.level.as_deref())?;
        note.hostility = parse_hostility(input.hostility.as_deref())?;
        note.locations = resolve_refs(&self.store, campaign, RecordKind::Location, &input.locations)?;
        note.organizations = resolve_refs(
            &self.store,
            campaign,
            RecordKind::Organization,
            &input.organizations,
        )?;
        note.characters =
            resolve_refs(&self.store, campaign, RecordKind::Character, &input.characters)?;
        note.content = optional_text(input.content.as_deref());
        note.validate()?;
        Ok(())
    }
}
