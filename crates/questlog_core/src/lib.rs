//! Core domain logic for Questlog.
//! This crate is the single source of truth for campaign invariants and the
//! note conversion rules.

pub mod convert;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use convert::{
    classify, plan_conversion, CharacterOptions, ConversionError, ConversionPlan,
    ConversionRequest, ConvertedEntity, EligibleTypes,
};
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::character::{Character, CharacterKind};
pub use model::ids::{
    CampaignId, CharacterId, EventId, LocationId, NoteId, OrganizationId, UserId,
};
pub use model::vocab::{CharacterClass, EntityType, Hostility, RecordKind};
pub use model::ValidationError;
pub use repo::{RepoError, RepoResult, SqliteStore};
pub use service::campaign_service::CampaignService;
pub use service::conversion_service::{execute_conversion, ConversionPreview, ConversionService};
pub use service::entity_service::EntityService;
pub use service::input::{
    CharacterInput, EventInput, LocationInput, NoteInput, OrganizationInput, TIME_FORMAT,
};
pub use service::note_service::NoteService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
