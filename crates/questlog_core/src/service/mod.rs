//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into campaign-scoped use-case APIs.
//! - Parse raw form-style input and enforce campaign ownership of every
//!   referenced record.
//! - Keep the CLI (or any other front end) decoupled from storage details.
//!
//! # Invariants
//! - A record id passed in from outside is trusted only after its owning
//!   campaign has been checked against the caller's campaign.
//! - Failed calls leave storage unchanged.

pub mod campaign_service;
pub mod conversion_service;
pub mod entity_service;
pub mod input;
pub mod note_service;

use crate::convert::{describe_types, ConversionError};
use crate::db::DbError;
use crate::model::ids::{CampaignId, RecordId, UserId};
use crate::model::vocab::{EntityType, RecordKind};
use crate::model::ValidationError;
use crate::repo::{CampaignRepository, ReferenceLookup, RepoError};
use crate::service::input::parse_id;
use thiserror::Error;
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to callers of the services.
///
/// Everything except `Repo` is user-correctable input.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Chosen conversion target is not eligible for the note right now.
    #[error("cannot convert note to `{requested}`; eligible types: {}", describe_types(eligible))]
    InvalidChoice {
        requested: String,
        eligible: Vec<EntityType>,
    },
    /// Missing record, or one that belongs to another campaign.
    #[error("{kind} not found in this campaign: {id}")]
    ReferenceNotFound { kind: RecordKind, id: Uuid },
    /// Unparseable or invalid scalar input.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("username `{0}` is already taken")]
    UsernameTaken(String),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::ReferenceNotFound { kind, id },
            RepoError::Validation(err) => Self::MalformedInput(err.to_string()),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::MalformedInput(value.to_string())
    }
}

impl From<ConversionError> for ServiceError {
    fn from(value: ConversionError) -> Self {
        match value {
            ConversionError::InvalidChoice {
                requested,
                eligible,
            } => Self::InvalidChoice {
                requested,
                eligible,
            },
            ConversionError::MalformedInput(message) => Self::MalformedInput(message),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::Db(DbError::Sqlite(value)))
    }
}

impl ServiceError {
    pub(crate) fn missing(kind: RecordKind, id: impl RecordId) -> Self {
        Self::ReferenceNotFound { kind, id: id.uuid() }
    }

    /// Stable machine-readable code, used in log lines and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidChoice { .. } => "invalid_choice",
            Self::ReferenceNotFound { .. } => "reference_not_found",
            Self::MalformedInput(_) => "malformed_input",
            Self::UsernameTaken(_) => "username_taken",
            Self::Repo(_) => "storage_error",
        }
    }
}

/// Fails with `ReferenceNotFound` unless `id` is a `kind` record of `campaign`.
pub(crate) fn ensure_owned<S, T>(
    store: &S,
    campaign: CampaignId,
    kind: RecordKind,
    id: T,
) -> ServiceResult<()>
where
    S: ReferenceLookup + ?Sized,
    T: RecordId,
{
    match store.owning_campaign(kind, id.uuid())? {
        Some(owner) if owner == campaign => Ok(()),
        _ => Err(ServiceError::missing(kind, id)),
    }
}

pub(crate) fn ensure_campaign<S>(store: &S, campaign: CampaignId) -> ServiceResult<()>
where
    S: ReferenceLookup + ?Sized,
{
    ensure_owned(store, campaign, RecordKind::Campaign, campaign)
}

/// Fails with `ReferenceNotFound` unless `user` exists and belongs to the
/// campaign (dungeon master or approved member).
pub(crate) fn ensure_member<S>(store: &S, campaign: CampaignId, user: UserId) -> ServiceResult<()>
where
    S: CampaignRepository + ?Sized,
{
    if store.get_user(user)?.is_none() || !store.is_member(campaign, user)? {
        return Err(ServiceError::missing(RecordKind::User, user));
    }
    Ok(())
}

/// Parses an optional raw id and checks its ownership.
pub(crate) fn resolve_ref<S, T>(
    store: &S,
    campaign: CampaignId,
    kind: RecordKind,
    raw: Option<&str>,
) -> ServiceResult<Option<T>>
where
    S: ReferenceLookup + ?Sized,
    T: RecordId,
{
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let id: T = parse_id(kind, raw)?;
    ensure_owned(store, campaign, kind, id)?;
    Ok(Some(id))
}

/// Parses a raw id list, checks ownership of each and drops duplicates
/// while keeping first-seen order.
pub(crate) fn resolve_refs<S, T>(
    store: &S,
    campaign: CampaignId,
    kind: RecordKind,
    raw: &[String],
) -> ServiceResult<Vec<T>>
where
    S: ReferenceLookup + ?Sized,
    T: RecordId + PartialEq,
{
    let mut resolved: Vec<T> = Vec::with_capacity(raw.len());
    for value in raw {
        if let Some(id) = resolve_ref::<S, T>(store, campaign, kind, Some(value))? {
            if !resolved.contains(&id) {
                resolved.push(id);
            }
        }
    }
    Ok(resolved)
}
