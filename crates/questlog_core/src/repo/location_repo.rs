use crate::model::ids::{CampaignId, LocationId};
use crate::model::location::Location;
use crate::model::vocab::RecordKind;
use crate::repo::links::LOCATION_NEIGHBORS;
use crate::repo::row::{hostility_from_db, id_column};
use crate::repo::{RepoError, RepoResult, SqliteStore};
use rusqlite::{params, Connection, Row};

const LOCATION_SELECT_SQL: &str = "SELECT
    uuid,
    campaign_uuid,
    name,
    hostility,
    description
FROM locations";

/// Repository interface for locations and their neighborhood.
pub trait LocationRepository {
    fn create_location(&self, location: &Location) -> RepoResult<LocationId>;
    fn update_location(&self, location: &Location) -> RepoResult<()>;
    fn get_location(&self, id: LocationId) -> RepoResult<Option<Location>>;
    /// Lists a campaign's locations ordered by name.
    fn list_locations(&self, campaign: CampaignId) -> RepoResult<Vec<Location>>;
    fn delete_location(&self, id: LocationId) -> RepoResult<()>;
}

impl LocationRepository for SqliteStore<'_> {
    fn create_location(&self, location: &Location) -> RepoResult<LocationId> {
        location.validate()?;
        self.conn().execute(
            "INSERT INTO locations (uuid, campaign_uuid, name, hostility, description)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                location.id.to_string(),
                location.campaign_id.to_string(),
                location.name.as_str(),
                location.hostility.code(),
                location.description.as_deref(),
            ],
        )?;
        LOCATION_NEIGHBORS.replace(self.conn(), location.id, &location.neighbors)?;
        Ok(location.id)
    }

    fn update_location(&self, location: &Location) -> RepoResult<()> {
        location.validate()?;
        let changed = self.conn().execute(
            "UPDATE locations
             SET
                name = ?1,
                hostility = ?2,
                description = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                location.name.as_str(),
                location.hostility.code(),
                location.description.as_deref(),
                location.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Location, location.id));
        }
        LOCATION_NEIGHBORS.replace(self.conn(), location.id, &location.neighbors)
    }

    fn get_location(&self, id: LocationId) -> RepoResult<Option<Location>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{LOCATION_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_location_row(self.conn(), row)?));
        }
        Ok(None)
    }

    fn list_locations(&self, campaign: CampaignId) -> RepoResult<Vec<Location>> {
        let mut stmt = self.conn().prepare(&format!(
            "{LOCATION_SELECT_SQL}
             WHERE campaign_uuid = ?1
             ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([campaign.to_string()])?;
        let mut locations = Vec::new();
        while let Some(row) = rows.next()? {
            locations.push(parse_location_row(self.conn(), row)?);
        }
        Ok(locations)
    }

    fn delete_location(&self, id: LocationId) -> RepoResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM locations WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Location, id));
        }
        Ok(())
    }
}

fn parse_location_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Location> {
    let id: LocationId = id_column(row, "uuid")?;
    let hostility: String = row.get("hostility")?;
    let location = Location {
        id,
        campaign_id: id_column(row, "campaign_uuid")?,
        name: row.get("name")?,
        hostility: hostility_from_db(&hostility, "locations.hostility")?,
        neighbors: LOCATION_NEIGHBORS.load(conn, id)?,
        description: row.get("description")?,
    };
    location.validate()?;
    Ok(location)
}
