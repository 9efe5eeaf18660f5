//! Note persistence.
//!
//! # Invariants
//! - Link sets (`note_locations`, `note_organizations`, `note_characters`)
//!   are replaced as a whole on every write.
//! - Note lists are sorted by `updated_at DESC, uuid ASC`.
//! - Deleting a linked location/organization/character silently drops it
//!   from the note (cascade on the link table).

use crate::model::ids::{CampaignId, NoteId};
use crate::model::note::Note;
use crate::model::vocab::RecordKind;
use crate::repo::links::{NOTE_CHARACTERS, NOTE_LOCATIONS, NOTE_ORGANIZATIONS};
use crate::repo::row::{
    id_column, level_from_db, optional_class_column, optional_hostility_column,
    optional_time_column, time_to_db,
};
use crate::repo::{RepoError, RepoResult, SqliteStore};
use rusqlite::{params, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    campaign_uuid,
    title,
    start_at,
    end_at,
    race,
    class,
    level,
    hostility,
    content
FROM notes";

/// Repository interface for campaign notes.
pub trait NoteRepository {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Replaces every field and link set of an existing note.
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn list_notes(&self, campaign: CampaignId) -> RepoResult<Vec<Note>>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

impl NoteRepository for SqliteStore<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;
        self.conn().execute(
            "INSERT INTO notes (
                uuid,
                campaign_uuid,
                title,
                start_at,
                end_at,
                race,
                class,
                level,
                hostility,
                content
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                note.id.to_string(),
                note.campaign_id.to_string(),
                note.title.as_str(),
                note.start.map(time_to_db),
                note.end.map(time_to_db),
                note.race.as_deref(),
                note.class.map(|class| class.code()),
                note.level.map(i64::from),
                note.hostility.map(|hostility| hostility.code()),
                note.content.as_deref(),
            ],
        )?;
        write_links(self.conn(), note)?;
        Ok(note.id)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        note.validate()?;
        let changed = self.conn().execute(
            "UPDATE notes
             SET
                title = ?1,
                start_at = ?2,
                end_at = ?3,
                race = ?4,
                class = ?5,
                level = ?6,
                hostility = ?7,
                content = ?8,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?9;",
            params![
                note.title.as_str(),
                note.start.map(time_to_db),
                note.end.map(time_to_db),
                note.race.as_deref(),
                note.class.map(|class| class.code()),
                note.level.map(i64::from),
                note.hostility.map(|hostility| hostility.code()),
                note.content.as_deref(),
                note.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Note, note.id));
        }
        write_links(self.conn(), note)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(self.conn(), row)?));
        }
        Ok(None)
    }

    fn list_notes(&self, campaign: CampaignId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn().prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE campaign_uuid = ?1
             ORDER BY updated_at DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([campaign.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(self.conn(), row)?);
        }
        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Note, id));
        }
        Ok(())
    }
}

fn write_links(conn: &Connection, note: &Note) -> RepoResult<()> {
    NOTE_LOCATIONS.replace(conn, note.id, &note.locations)?;
    NOTE_ORGANIZATIONS.replace(conn, note.id, &note.organizations)?;
    NOTE_CHARACTERS.replace(conn, note.id, &note.characters)
}

fn parse_note_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Note> {
    let id: NoteId = id_column(row, "uuid")?;
    let level = row
        .get::<_, Option<i64>>("level")?
        .map(|value| level_from_db(value, "notes.level"))
        .transpose()?;

    let note = Note {
        id,
        campaign_id: id_column(row, "campaign_uuid")?,
        title: row.get("title")?,
        start: optional_time_column(row, "start_at")?,
        end: optional_time_column(row, "end_at")?,
        race: row.get("race")?,
        class: optional_class_column(row, "class")?,
        level,
        hostility: optional_hostility_column(row, "hostility")?,
        locations: NOTE_LOCATIONS.load(conn, id)?,
        organizations: NOTE_ORGANIZATIONS.load(conn, id)?,
        characters: NOTE_CHARACTERS.load(conn, id)?,
        content: row.get("content")?,
    };
    note.validate()?;
    Ok(note)
}
