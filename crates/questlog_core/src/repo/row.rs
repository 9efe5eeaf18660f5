//! Column encoding helpers shared by the SQLite repositories.

use crate::model::ids::RecordId;
use crate::model::vocab::{CharacterClass, Hostility};
use crate::model::Timestamp;
use crate::repo::{RepoError, RepoResult};
use chrono::DateTime;
use rusqlite::Row;
use uuid::Uuid;

pub(crate) fn parse_uuid<T: RecordId>(value: &str, column: &str) -> RepoResult<T> {
    Uuid::parse_str(value)
        .map(T::from)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn id_column<T: RecordId>(row: &Row<'_>, column: &str) -> RepoResult<T> {
    let value: String = row.get(column)?;
    parse_uuid(&value, column)
}

pub(crate) fn optional_id_column<T: RecordId>(
    row: &Row<'_>,
    column: &str,
) -> RepoResult<Option<T>> {
    row.get::<_, Option<String>>(column)?
        .map(|value| parse_uuid(&value, column))
        .transpose()
}

pub(crate) fn time_to_db(value: Timestamp) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn time_from_db(value: i64, column: &str) -> RepoResult<Timestamp> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| RepoError::InvalidData(format!("timestamp `{value}` out of range in {column}")))
}

pub(crate) fn optional_time_column(row: &Row<'_>, column: &str) -> RepoResult<Option<Timestamp>> {
    row.get::<_, Option<i64>>(column)?
        .map(|value| time_from_db(value, column))
        .transpose()
}

pub(crate) fn hostility_from_db(value: &str, column: &str) -> RepoResult<Hostility> {
    Hostility::from_code(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid hostility `{value}` in {column}")))
}

pub(crate) fn optional_hostility_column(
    row: &Row<'_>,
    column: &str,
) -> RepoResult<Option<Hostility>> {
    row.get::<_, Option<String>>(column)?
        .map(|value| hostility_from_db(&value, column))
        .transpose()
}

pub(crate) fn optional_class_column(
    row: &Row<'_>,
    column: &str,
) -> RepoResult<Option<CharacterClass>> {
    row.get::<_, Option<String>>(column)?
        .map(|value| {
            CharacterClass::from_code(&value).map_err(|_| {
                RepoError::InvalidData(format!("invalid class `{value}` in {column}"))
            })
        })
        .transpose()
}

pub(crate) fn level_from_db(value: i64, column: &str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid level `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn bool_from_db(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
