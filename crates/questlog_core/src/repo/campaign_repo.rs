//! User and campaign persistence.
//!
//! # Invariants
//! - Usernames are unique (case-insensitive, enforced by the schema).
//! - `Campaign::members` is stored in `campaign_members` and replaced as a
//!   whole on update.

use crate::model::campaign::{Campaign, User};
use crate::model::ids::{CampaignId, RecordId, UserId};
use crate::model::vocab::RecordKind;
use crate::repo::row::{bool_from_db, bool_to_int, id_column};
use crate::repo::{RepoError, RepoResult, SqliteStore};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CAMPAIGN_SELECT_SQL: &str = "SELECT
    uuid,
    dm_uuid,
    name,
    description,
    is_public
FROM campaigns";

/// Repository interface for users, campaigns and membership.
pub trait CampaignRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn find_user_by_name(&self, username: &str) -> RepoResult<Option<User>>;
    fn create_campaign(&self, campaign: &Campaign) -> RepoResult<CampaignId>;
    /// Replaces name, description, visibility and the member set.
    fn update_campaign(&self, campaign: &Campaign) -> RepoResult<()>;
    fn get_campaign(&self, id: CampaignId) -> RepoResult<Option<Campaign>>;
    /// Lists campaigns `user` runs or is approved for, ordered by name.
    fn list_campaigns_for(&self, user: UserId) -> RepoResult<Vec<Campaign>>;
    /// Deletes a campaign and, by cascade, every record it owns.
    fn delete_campaign(&self, id: CampaignId) -> RepoResult<()>;
    fn add_member(&self, campaign: CampaignId, user: UserId) -> RepoResult<()>;
    /// True when `user` is the dungeon master or an approved member.
    fn is_member(&self, campaign: CampaignId, user: UserId) -> RepoResult<bool>;
}

impl CampaignRepository for SqliteStore<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;
        self.conn().execute(
            "INSERT INTO users (uuid, username) VALUES (?1, ?2);",
            params![user.id.to_string(), user.username.as_str()],
        )?;
        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.conn()
            .query_row(
                "SELECT uuid, username FROM users WHERE uuid = ?1;",
                [id.to_string()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?
            .map(|(uuid, username)| parse_user(&uuid, username))
            .transpose()
    }

    fn find_user_by_name(&self, username: &str) -> RepoResult<Option<User>> {
        self.conn()
            .query_row(
                "SELECT uuid, username FROM users WHERE username = ?1 COLLATE NOCASE;",
                [username.trim()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?
            .map(|(uuid, username)| parse_user(&uuid, username))
            .transpose()
    }

    fn create_campaign(&self, campaign: &Campaign) -> RepoResult<CampaignId> {
        campaign.validate()?;
        self.conn().execute(
            "INSERT INTO campaigns (uuid, dm_uuid, name, description, is_public)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                campaign.id.to_string(),
                campaign.dm.to_string(),
                campaign.name.as_str(),
                campaign.description.as_deref(),
                bool_to_int(campaign.is_public),
            ],
        )?;
        replace_members(self.conn(), campaign)?;
        Ok(campaign.id)
    }

    fn update_campaign(&self, campaign: &Campaign) -> RepoResult<()> {
        campaign.validate()?;
        let changed = self.conn().execute(
            "UPDATE campaigns
             SET
                name = ?1,
                description = ?2,
                is_public = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                campaign.name.as_str(),
                campaign.description.as_deref(),
                bool_to_int(campaign.is_public),
                campaign.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Campaign, campaign.id));
        }
        replace_members(self.conn(), campaign)
    }

    fn get_campaign(&self, id: CampaignId) -> RepoResult<Option<Campaign>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{CAMPAIGN_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_campaign_row(self.conn(), row)?));
        }
        Ok(None)
    }

    fn list_campaigns_for(&self, user: UserId) -> RepoResult<Vec<Campaign>> {
        let mut stmt = self.conn().prepare(&format!(
            "{CAMPAIGN_SELECT_SQL}
             WHERE dm_uuid = ?1
                OR uuid IN (SELECT campaign_uuid FROM campaign_members WHERE user_uuid = ?1)
             ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([user.to_string()])?;
        let mut campaigns = Vec::new();
        while let Some(row) = rows.next()? {
            campaigns.push(parse_campaign_row(self.conn(), row)?);
        }
        Ok(campaigns)
    }

    fn delete_campaign(&self, id: CampaignId) -> RepoResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM campaigns WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Campaign, id));
        }
        Ok(())
    }

    fn add_member(&self, campaign: CampaignId, user: UserId) -> RepoResult<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO campaign_members (campaign_uuid, user_uuid) VALUES (?1, ?2);",
            params![campaign.to_string(), user.to_string()],
        )?;
        Ok(())
    }

    fn is_member(&self, campaign: CampaignId, user: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn().query_row(
            "SELECT EXISTS(
                SELECT 1 FROM campaigns WHERE uuid = ?1 AND dm_uuid = ?2
                UNION ALL
                SELECT 1 FROM campaign_members WHERE campaign_uuid = ?1 AND user_uuid = ?2
            );",
            params![campaign.to_string(), user.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_user(uuid: &str, username: String) -> RepoResult<User> {
    Ok(User {
        id: crate::repo::row::parse_uuid(uuid, "users.uuid")?,
        username,
    })
}

fn parse_campaign_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Campaign> {
    let id: CampaignId = id_column(row, "uuid")?;
    let campaign = Campaign {
        id,
        dm: id_column(row, "dm_uuid")?,
        name: row.get("name")?,
        description: row.get("description")?,
        is_public: bool_from_db(row.get("is_public")?, "campaigns.is_public")?,
        members: load_members(conn, id)?,
    };
    campaign.validate()?;
    Ok(campaign)
}

fn load_members(conn: &Connection, campaign: CampaignId) -> RepoResult<Vec<UserId>> {
    let mut stmt = conn.prepare(
        "SELECT user_uuid FROM campaign_members WHERE campaign_uuid = ?1 ORDER BY rowid ASC;",
    )?;
    let mut rows = stmt.query([campaign.uuid().to_string()])?;
    let mut members = Vec::new();
    while let Some(row) = rows.next()? {
        members.push(id_column(row, "user_uuid")?);
    }
    Ok(members)
}

fn replace_members(conn: &Connection, campaign: &Campaign) -> RepoResult<()> {
    conn.execute(
        "DELETE FROM campaign_members WHERE campaign_uuid = ?1;",
        [campaign.id.to_string()],
    )?;
    for member in &campaign.members {
        if *member == campaign.dm {
            continue;
        }
        conn.execute(
            "INSERT OR IGNORE INTO campaign_members (campaign_uuid, user_uuid) VALUES (?1, ?2);",
            params![campaign.id.to_string(), member.to_string()],
        )?;
    }
    Ok(())
}
