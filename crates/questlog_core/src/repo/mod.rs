//! Repository layer abstractions and the SQLite implementation.
//!
//! # Responsibility
//! - Define per-record data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Write paths call the record's `validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Repositories do not check campaign ownership; services do.

pub mod campaign_repo;
pub mod character_repo;
pub mod event_repo;
pub mod location_repo;
pub mod note_repo;
pub mod organization_repo;

mod links;
mod row;

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::ids::{CampaignId, RecordId};
use crate::model::vocab::RecordKind;
use crate::model::ValidationError;
use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;
use uuid::Uuid;

pub use campaign_repo::CampaignRepository;
pub use character_repo::CharacterRepository;
pub use event_repo::EventRepository;
pub use location_repo::LocationRepository;
pub use note_repo::NoteRepository;
pub use organization_repo::OrganizationRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: Uuid },
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error(
        "connection is not migrated: expected schema version {expected_version}, found {actual_version}"
    )]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    pub(crate) fn not_found(kind: RecordKind, id: impl RecordId) -> Self {
        Self::NotFound { kind, id: id.uuid() }
    }
}

/// Looks up which campaign owns a campaign-scoped record.
pub trait ReferenceLookup {
    /// Returns `None` when no record of `kind` has this id.
    ///
    /// Users are not campaign-scoped; asking for `RecordKind::User` is an
    /// `InvalidData` error.
    fn owning_campaign(&self, kind: RecordKind, id: Uuid) -> RepoResult<Option<CampaignId>>;
}

/// Everything a campaign service needs from storage.
pub trait CampaignStore:
    CampaignRepository
    + LocationRepository
    + OrganizationRepository
    + CharacterRepository
    + EventRepository
    + NoteRepository
    + ReferenceLookup
{
}

impl<T> CampaignStore for T where
    T: CampaignRepository
        + LocationRepository
        + OrganizationRepository
        + CharacterRepository
        + EventRepository
        + NoteRepository
        + ReferenceLookup
{
}

/// SQLite-backed implementation of every repository contract.
///
/// Borrowing a `Connection` (rather than owning one) lets callers hand in a
/// `rusqlite::Transaction`, which derefs to `Connection`, so several
/// repository calls can share one atomic scope.
#[derive(Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// Fails with `UninitializedConnection` when the schema version does not
    /// match the binary, and `InvalidData` when a required table is missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for table in ["campaigns", "locations", "notes"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::InvalidData(format!(
                    "required table `{table}` is missing"
                )));
            }
        }

        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }
}

impl ReferenceLookup for SqliteStore<'_> {
    fn owning_campaign(&self, kind: RecordKind, id: Uuid) -> RepoResult<Option<CampaignId>> {
        let sql = match kind {
            RecordKind::Campaign => "SELECT uuid FROM campaigns WHERE uuid = ?1;",
            RecordKind::Location => "SELECT campaign_uuid FROM locations WHERE uuid = ?1;",
            RecordKind::Organization => "SELECT campaign_uuid FROM organizations WHERE uuid = ?1;",
            RecordKind::Character => "SELECT campaign_uuid FROM characters WHERE uuid = ?1;",
            RecordKind::Event => "SELECT campaign_uuid FROM events WHERE uuid = ?1;",
            RecordKind::Note => "SELECT campaign_uuid FROM notes WHERE uuid = ?1;",
            RecordKind::User => {
                return Err(RepoError::InvalidData(
                    "users are not owned by a campaign".to_string(),
                ));
            }
        };

        let owner: Option<String> = self
            .conn
            .query_row(sql, [id.to_string()], |row| row.get(0))
            .optional()?;
        owner
            .map(|value| row::parse_uuid::<CampaignId>(&value, "campaign_uuid"))
            .transpose()
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
