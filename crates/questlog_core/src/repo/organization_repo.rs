use crate::model::ids::{CampaignId, OrganizationId};
use crate::model::organization::Organization;
use crate::model::vocab::RecordKind;
use crate::repo::links::ORGANIZATION_RELATIONS;
use crate::repo::row::{hostility_from_db, id_column, optional_id_column};
use crate::repo::{RepoError, RepoResult, SqliteStore};
use rusqlite::{params, Connection, Row};

const ORGANIZATION_SELECT_SQL: &str = "SELECT
    uuid,
    campaign_uuid,
    name,
    location_uuid,
    hostility,
    description
FROM organizations";

/// Repository interface for organizations.
pub trait OrganizationRepository {
    fn create_organization(&self, organization: &Organization) -> RepoResult<OrganizationId>;
    fn update_organization(&self, organization: &Organization) -> RepoResult<()>;
    fn get_organization(&self, id: OrganizationId) -> RepoResult<Option<Organization>>;
    fn list_organizations(&self, campaign: CampaignId) -> RepoResult<Vec<Organization>>;
    fn delete_organization(&self, id: OrganizationId) -> RepoResult<()>;
}

impl OrganizationRepository for SqliteStore<'_> {
    fn create_organization(&self, organization: &Organization) -> RepoResult<OrganizationId> {
        organization.validate()?;
        self.conn().execute(
            "INSERT INTO organizations (
                uuid,
                campaign_uuid,
                name,
                location_uuid,
                hostility,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                organization.id.to_string(),
                organization.campaign_id.to_string(),
                organization.name.as_str(),
                organization.location.map(|id| id.to_string()),
                organization.hostility.code(),
                organization.description.as_deref(),
            ],
        )?;
        ORGANIZATION_RELATIONS.replace(self.conn(), organization.id, &organization.related)?;
        Ok(organization.id)
    }

    fn update_organization(&self, organization: &Organization) -> RepoResult<()> {
        organization.validate()?;
        let changed = self.conn().execute(
            "UPDATE organizations
             SET
                name = ?1,
                location_uuid = ?2,
                hostility = ?3,
                description = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?5;",
            params![
                organization.name.as_str(),
                organization.location.map(|id| id.to_string()),
                organization.hostility.code(),
                organization.description.as_deref(),
                organization.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(
                RecordKind::Organization,
                organization.id,
            ));
        }
        ORGANIZATION_RELATIONS.replace(self.conn(), organization.id, &organization.related)
    }

    fn get_organization(&self, id: OrganizationId) -> RepoResult<Option<Organization>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{ORGANIZATION_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_organization_row(self.conn(), row)?));
        }
        Ok(None)
    }

    fn list_organizations(&self, campaign: CampaignId) -> RepoResult<Vec<Organization>> {
        let mut stmt = self.conn().prepare(&format!(
            "{ORGANIZATION_SELECT_SQL}
             WHERE campaign_uuid = ?1
             ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([campaign.to_string()])?;
        let mut organizations = Vec::new();
        while let Some(row) = rows.next()? {
            organizations.push(parse_organization_row(self.conn(), row)?);
        }
        Ok(organizations)
    }

    fn delete_organization(&self, id: OrganizationId) -> RepoResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM organizations WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Organization, id));
        }
        Ok(())
    }
}

fn parse_organization_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Organization> {
    let id: OrganizationId = id_column(row, "uuid")?;
    let hostility: String = row.get("hostility")?;
    let organization = Organization {
        id,
        campaign_id: id_column(row, "campaign_uuid")?,
        name: row.get("name")?,
        location: optional_id_column(row, "location_uuid")?,
        hostility: hostility_from_db(&hostility, "organizations.hostility")?,
        related: ORGANIZATION_RELATIONS.load(conn, id)?,
        description: row.get("description")?,
    };
    organization.validate()?;
    Ok(organization)
}
