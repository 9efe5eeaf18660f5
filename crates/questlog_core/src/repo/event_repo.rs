use crate::model::event::Event;
use crate::model::ids::{CampaignId, EventId};
use crate::model::vocab::RecordKind;
use crate::repo::links::{EVENT_CHARACTERS, EVENT_ORGANIZATIONS};
use crate::repo::row::{id_column, optional_id_column, optional_time_column, time_from_db, time_to_db};
use crate::repo::{RepoError, RepoResult, SqliteStore};
use rusqlite::{params, Connection, Row};

const EVENT_SELECT_SQL: &str = "SELECT
    uuid,
    campaign_uuid,
    title,
    start_at,
    end_at,
    location_uuid,
    description
FROM events";

/// Repository interface for events.
pub trait EventRepository {
    fn create_event(&self, event: &Event) -> RepoResult<EventId>;
    fn update_event(&self, event: &Event) -> RepoResult<()>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Lists a campaign's events in chronological order.
    fn list_events(&self, campaign: CampaignId) -> RepoResult<Vec<Event>>;
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
}

impl EventRepository for SqliteStore<'_> {
    fn create_event(&self, event: &Event) -> RepoResult<EventId> {
        event.validate()?;
        self.conn().execute(
            "INSERT INTO events (
                uuid,
                campaign_uuid,
                title,
                start_at,
                end_at,
                location_uuid,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                event.id.to_string(),
                event.campaign_id.to_string(),
                event.title.as_str(),
                time_to_db(event.start),
                event.end.map(time_to_db),
                event.location.map(|id| id.to_string()),
                event.description.as_deref(),
            ],
        )?;
        write_links(self.conn(), event)?;
        Ok(event.id)
    }

    fn update_event(&self, event: &Event) -> RepoResult<()> {
        event.validate()?;
        let changed = self.conn().execute(
            "UPDATE events
             SET
                title = ?1,
                start_at = ?2,
                end_at = ?3,
                location_uuid = ?4,
                description = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?6;",
            params![
                event.title.as_str(),
                time_to_db(event.start),
                event.end.map(time_to_db),
                event.location.map(|id| id.to_string()),
                event.description.as_deref(),
                event.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Event, event.id));
        }
        write_links(self.conn(), event)
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(self.conn(), row)?));
        }
        Ok(None)
    }

    fn list_events(&self, campaign: CampaignId) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn().prepare(&format!(
            "{EVENT_SELECT_SQL}
             WHERE campaign_uuid = ?1
             ORDER BY start_at ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([campaign.to_string()])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(self.conn(), row)?);
        }
        Ok(events)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM events WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Event, id));
        }
        Ok(())
    }
}

fn write_links(conn: &Connection, event: &Event) -> RepoResult<()> {
    EVENT_ORGANIZATIONS.replace(conn, event.id, &event.organizations)?;
    EVENT_CHARACTERS.replace(conn, event.id, &event.characters)
}

fn parse_event_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Event> {
    let id: EventId = id_column(row, "uuid")?;
    let event = Event {
        id,
        campaign_id: id_column(row, "campaign_uuid")?,
        title: row.get("title")?,
        start: time_from_db(row.get("start_at")?, "events.start_at")?,
        end: optional_time_column(row, "end_at")?,
        location: optional_id_column(row, "location_uuid")?,
        organizations: EVENT_ORGANIZATIONS.load(conn, id)?,
        characters: EVENT_CHARACTERS.load(conn, id)?,
        description: row.get("description")?,
    };
    event.validate()?;
    Ok(event)
}
