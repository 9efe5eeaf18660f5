//! Raw form-style input and its parsing rules.
//!
//! Front ends hand the services strings exactly as a user typed them. Blank
//! optional values mean "not given"; anything else must parse or the call
//! fails with `MalformedInput`.

use crate::model::ids::RecordId;
use crate::model::vocab::{CharacterClass, Hostility, RecordKind};
use crate::model::Timestamp;
use crate::service::{ServiceError, ServiceResult};
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Accepted time format (minute precision, interpreted as UTC).
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationInput {
    pub name: String,
    /// Hostility code; blank means Neutral.
    pub hostility: Option<String>,
    pub neighbors: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationInput {
    pub name: String,
    pub location: Option<String>,
    pub hostility: Option<String>,
    pub related: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterInput {
    pub name: String,
    /// Blank means `Human`.
    pub race: Option<String>,
    pub class: Option<String>,
    /// Blank means 0.
    pub level: Option<String>,
    pub origin: Option<String>,
    pub organizations: Vec<String>,
    pub related_characters: Vec<String>,
    pub description: Option<String>,
    /// Chooses the variant on create. Ignored on update.
    pub is_player_character: bool,
    /// Player user id, player characters only.
    pub player: Option<String>,
    /// Hostility code, non-player characters only.
    pub hostility: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventInput {
    pub title: String,
    /// Required.
    pub start: String,
    pub end: Option<String>,
    pub location: Option<String>,
    pub organizations: Vec<String>,
    pub characters: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub race: Option<String>,
    pub class: Option<String>,
    pub level: Option<String>,
    pub hostility: Option<String>,
    pub locations: Vec<String>,
    pub organizations: Vec<String>,
    pub characters: Vec<String>,
    pub content: Option<String>,
}

/// Trims and drops blank values.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Trimmed required text.
pub fn required(field: &str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::MalformedInput(format!("missing {field}")));
    }
    Ok(trimmed.to_string())
}

/// Free text is kept verbatim unless it is blank.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

pub fn parse_time(field: &str, value: &str) -> ServiceResult<Timestamp> {
    NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            ServiceError::MalformedInput(format!(
                "invalid {field} `{}`: expected YYYY-MM-DDTHH:MM",
                value.trim()
            ))
        })
}

pub fn parse_optional_time(field: &str, value: Option<&str>) -> ServiceResult<Option<Timestamp>> {
    non_blank(value).map(|value| parse_time(field, value)).transpose()
}

pub fn parse_level(value: Option<&str>) -> ServiceResult<Option<u32>> {
    non_blank(value)
        .map(|value| {
            value.parse::<u32>().map_err(|_| {
                ServiceError::MalformedInput(format!(
                    "invalid level `{value}`: must be a non-negative integer"
                ))
            })
        })
        .transpose()
}

pub fn parse_hostility(value: Option<&str>) -> ServiceResult<Option<Hostility>> {
    non_blank(value)
        .map(|value| Hostility::from_code(value).map_err(ServiceError::from))
        .transpose()
}

pub fn parse_class(value: Option<&str>) -> ServiceResult<Option<CharacterClass>> {
    non_blank(value)
        .map(|value| CharacterClass::from_code(value).map_err(ServiceError::from))
        .transpose()
}

pub fn parse_id<T: RecordId>(kind: RecordKind, value: &str) -> ServiceResult<T> {
    Uuid::parse_str(value.trim())
        .map(T::from)
        .map_err(|_| ServiceError::MalformedInput(format!("invalid {kind} id `{}`", value.trim())))
}

#[cfg(test)]
mod tests {
    use super::{parse_class, parse_hostility, parse_level, parse_optional_time, parse_time};
    use crate::model::vocab::{CharacterClass, Hostility};
    use crate::service::ServiceError;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parse_time_uses_minute_precision_utc() {
        let parsed = parse_time("start time", "1402-03-01T12:30").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(1402, 3, 1, 12, 30, 0).unwrap());
    }

    #[test]
    fn parse_time_rejects_other_formats() {
        let err = parse_time("start time", "03/01/1402").unwrap_err();
        assert!(matches!(err, ServiceError::MalformedInput(message) if message.contains("start time")));
    }

    #[test]
    fn blank_optional_values_are_unset() {
        assert_eq!(parse_optional_time("end time", Some("  ")).unwrap(), None);
        assert_eq!(parse_level(Some("")).unwrap(), None);
        assert_eq!(parse_hostility(None).unwrap(), None);
        assert_eq!(parse_class(Some(" ")).unwrap(), None);
    }

    #[test]
    fn codes_and_levels_parse() {
        assert_eq!(parse_level(Some("7")).unwrap(), Some(7));
        assert!(parse_level(Some("-1")).is_err());
        assert!(parse_level(Some("seven")).is_err());
        assert_eq!(parse_hostility(Some("?")).unwrap(), Some(Hostility::Unknown));
        assert_eq!(parse_class(Some("P")).unwrap(), Some(CharacterClass::Paladin));
        assert!(parse_class(Some("Necromancer")).is_err());
    }
}
