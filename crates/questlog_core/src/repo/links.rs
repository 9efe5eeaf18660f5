//! Many-to-many link tables.
//!
//! # Invariants
//! - Link sets are replaced wholesale; partial edits go through a full
//!   `replace`.
//! - Symmetric tables store both directions, so loading from either side
//!   sees the link.
//! - Loaded links keep insertion order (`rowid`).

use crate::model::ids::RecordId;
use crate::repo::row::parse_uuid;
use crate::repo::RepoResult;
use rusqlite::{params, Connection};

pub(crate) struct LinkTable {
    table: &'static str,
    owner_column: &'static str,
    target_column: &'static str,
    symmetric: bool,
}

pub(crate) const LOCATION_NEIGHBORS: LinkTable = LinkTable {
    table: "location_neighbors",
    owner_column: "location_uuid",
    target_column: "neighbor_uuid",
    symmetric: true,
};

pub(crate) const ORGANIZATION_RELATIONS: LinkTable = LinkTable {
    table: "organization_relations",
    owner_column: "organization_uuid",
    target_column: "related_uuid",
    symmetric: true,
};

pub(crate) const CHARACTER_ORGANIZATIONS: LinkTable = LinkTable {
    table: "character_organizations",
    owner_column: "character_uuid",
    target_column: "organization_uuid",
    symmetric: false,
};

pub(crate) const CHARACTER_RELATIONS: LinkTable = LinkTable {
    table: "character_relations",
    owner_column: "character_uuid",
    target_column: "related_uuid",
    symmetric: true,
};

pub(crate) const EVENT_ORGANIZATIONS: LinkTable = LinkTable {
    table: "event_organizations",
    owner_column: "event_uuid",
    target_column: "organization_uuid",
    symmetric: false,
};

pub(crate) const EVENT_CHARACTERS: LinkTable = LinkTable {
    table: "event_characters",
    owner_column: "event_uuid",
    target_column: "character_uuid",
    symmetric: false,
};

pub(crate) const NOTE_LOCATIONS: LinkTable = LinkTable {
    table: "note_locations",
    owner_column: "note_uuid",
    target_column: "location_uuid",
    symmetric: false,
};

pub(crate) const NOTE_ORGANIZATIONS: LinkTable = LinkTable {
    table: "note_organizations",
    owner_column: "note_uuid",
    target_column: "organization_uuid",
    symmetric: false,
};

pub(crate) const NOTE_CHARACTERS: LinkTable = LinkTable {
    table: "note_characters",
    owner_column: "note_uuid",
    target_column: "character_uuid",
    symmetric: false,
};

impl LinkTable {
    /// Replaces every link of `owner` with `targets`.
    pub(crate) fn replace<O: RecordId, T: RecordId>(
        &self,
        conn: &Connection,
        owner: O,
        targets: &[T],
    ) -> RepoResult<()> {
        let owner = owner.uuid().to_string();
        conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1;", self.table, self.owner_column),
            [owner.as_str()],
        )?;
        if self.symmetric {
            conn.execute(
                &format!("DELETE FROM {} WHERE {} = ?1;", self.table, self.target_column),
                [owner.as_str()],
            )?;
        }

        let insert = format!(
            "INSERT OR IGNORE INTO {} ({}, {}) VALUES (?1, ?2);",
            self.table, self.owner_column, self.target_column
        );
        let mut stmt = conn.prepare(&insert)?;
        for target in targets {
            let target = target.uuid().to_string();
            stmt.execute(params![owner.as_str(), target.as_str()])?;
            if self.symmetric {
                stmt.execute(params![target.as_str(), owner.as_str()])?;
            }
        }
        Ok(())
    }

    /// Loads the targets linked from `owner` in insertion order.
    pub(crate) fn load<O: RecordId, T: RecordId>(
        &self,
        conn: &Connection,
        owner: O,
    ) -> RepoResult<Vec<T>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {target} FROM {table} WHERE {owner} = ?1 ORDER BY rowid ASC;",
            target = self.target_column,
            table = self.table,
            owner = self.owner_column,
        ))?;
        let mut rows = stmt.query([owner.uuid().to_string()])?;
        let mut targets = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            targets.push(parse_uuid(&value, self.target_column)?);
        }
        Ok(targets)
    }
}
