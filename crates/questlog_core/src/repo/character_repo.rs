//! Character persistence.
//!
//! The player/non-player variant maps onto a `kind` column plus nullable
//! `player_uuid` and `hostility` columns; a table CHECK keeps the pair
//! consistent with `kind`.

use crate::model::character::{Character, CharacterKind};
use crate::model::ids::{CampaignId, CharacterId};
use crate::model::vocab::RecordKind;
use crate::repo::links::{CHARACTER_ORGANIZATIONS, CHARACTER_RELATIONS};
use crate::repo::row::{
    id_column, level_from_db, optional_class_column, optional_hostility_column,
    optional_id_column,
};
use crate::repo::{RepoError, RepoResult, SqliteStore};
use rusqlite::{params, Connection, Row};

const CHARACTER_SELECT_SQL: &str = "SELECT
    uuid,
    campaign_uuid,
    name,
    race,
    class,
    level,
    origin_uuid,
    kind,
    player_uuid,
    hostility,
    description
FROM characters";

const KIND_PLAYER: &str = "player";
const KIND_NON_PLAYER: &str = "non_player";

/// Repository interface for characters.
pub trait CharacterRepository {
    fn create_character(&self, character: &Character) -> RepoResult<CharacterId>;
    fn update_character(&self, character: &Character) -> RepoResult<()>;
    fn get_character(&self, id: CharacterId) -> RepoResult<Option<Character>>;
    fn list_characters(&self, campaign: CampaignId) -> RepoResult<Vec<Character>>;
    fn delete_character(&self, id: CharacterId) -> RepoResult<()>;
}

struct KindColumns {
    kind: &'static str,
    player: Option<String>,
    hostility: Option<&'static str>,
}

fn kind_to_db(kind: CharacterKind) -> KindColumns {
    match kind {
        CharacterKind::Player { player } => KindColumns {
            kind: KIND_PLAYER,
            player: player.map(|id| id.to_string()),
            hostility: None,
        },
        CharacterKind::NonPlayer { hostility } => KindColumns {
            kind: KIND_NON_PLAYER,
            player: None,
            hostility: Some(hostility.code()),
        },
    }
}

impl CharacterRepository for SqliteStore<'_> {
    fn create_character(&self, character: &Character) -> RepoResult<CharacterId> {
        character.validate()?;
        let kind = kind_to_db(character.kind);
        self.conn().execute(
            "INSERT INTO characters (
                uuid,
                campaign_uuid,
                name,
                race,
                class,
                level,
                origin_uuid,
                kind,
                player_uuid,
                hostility,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                character.id.to_string(),
                character.campaign_id.to_string(),
                character.name.as_str(),
                character.race.as_str(),
                character.class.map(|class| class.code()),
                i64::from(character.level),
                character.origin.map(|id| id.to_string()),
                kind.kind,
                kind.player,
                kind.hostility,
                character.description.as_deref(),
            ],
        )?;
        write_links(self.conn(), character)?;
        Ok(character.id)
    }

    fn update_character(&self, character: &Character) -> RepoResult<()> {
        character.validate()?;
        let kind = kind_to_db(character.kind);
        let changed = self.conn().execute(
            "UPDATE characters
             SET
                name = ?1,
                race = ?2,
                class = ?3,
                level = ?4,
                origin_uuid = ?5,
                kind = ?6,
                player_uuid = ?7,
                hostility = ?8,
                description = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?10;",
            params![
                character.name.as_str(),
                character.race.as_str(),
                character.class.map(|class| class.code()),
                i64::from(character.level),
                character.origin.map(|id| id.to_string()),
                kind.kind,
                kind.player,
                kind.hostility,
                character.description.as_deref(),
                character.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Character, character.id));
        }
        write_links(self.conn(), character)
    }

    fn get_character(&self, id: CharacterId) -> RepoResult<Option<Character>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("{CHARACTER_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_character_row(self.conn(), row)?));
        }
        Ok(None)
    }

    fn list_characters(&self, campaign: CampaignId) -> RepoResult<Vec<Character>> {
        let mut stmt = self.conn().prepare(&format!(
            "{CHARACTER_SELECT_SQL}
             WHERE campaign_uuid = ?1
             ORDER BY name COLLATE NOCASE ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([campaign.to_string()])?;
        let mut characters = Vec::new();
        while let Some(row) = rows.next()? {
            characters.push(parse_character_row(self.conn(), row)?);
        }
        Ok(characters)
    }

    fn delete_character(&self, id: CharacterId) -> RepoResult<()> {
        let changed = self
            .conn()
            .execute("DELETE FROM characters WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(RecordKind::Character, id));
        }
        Ok(())
    }
}

fn write_links(conn: &Connection, character: &Character) -> RepoResult<()> {
    CHARACTER_ORGANIZATIONS.replace(conn, character.id, &character.organizations)?;
    CHARACTER_RELATIONS.replace(conn, character.id, &character.related_characters)
}

fn parse_character_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Character> {
    let id: CharacterId = id_column(row, "uuid")?;
    let kind_text: String = row.get("kind")?;
    let hostility = optional_hostility_column(row, "hostility")?;
    let kind = match (kind_text.as_str(), hostility) {
        (KIND_PLAYER, None) => CharacterKind::Player {
            player: optional_id_column(row, "player_uuid")?,
        },
        (KIND_NON_PLAYER, Some(hostility)) => CharacterKind::NonPlayer { hostility },
        (other, _) => {
            return Err(RepoError::InvalidData(format!(
                "inconsistent character kind `{other}` for {id}"
            )));
        }
    };

    let character = Character {
        id,
        campaign_id: id_column(row, "campaign_uuid")?,
        name: row.get("name")?,
        race: row.get("race")?,
        class: optional_class_column(row, "class")?,
        level: level_from_db(row.get("level")?, "characters.level")?,
        origin: optional_id_column(row, "origin_uuid")?,
        kind,
        organizations: CHARACTER_ORGANIZATIONS.load(conn, id)?,
        related_characters: CHARACTER_RELATIONS.load(conn, id)?,
        description: row.get("description")?,
    };
    character.validate()?;
    Ok(character)
}
