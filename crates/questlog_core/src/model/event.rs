use crate::model::ids::{CampaignId, CharacterId, EventId, LocationId, OrganizationId};
use crate::model::{ensure_not_blank, ensure_time_range, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// Something that happened (or will happen) in the campaign.
///
/// `end`, when set, is never earlier than `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub campaign_id: CampaignId,
    pub title: String,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub location: Option<LocationId>,
    pub organizations: Vec<OrganizationId>,
    pub characters: Vec<CharacterId>,
    pub description: Option<String>,
}

impl Event {
    pub fn new(campaign_id: CampaignId, title: impl Into<String>, start: Timestamp) -> Self {
        Self {
            id: EventId::new(),
            campaign_id,
            title: title.into(),
            start,
            end: None,
            location: None,
            organizations: Vec::new(),
            characters: Vec::new(),
            description: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("event title", &self.title)?;
        ensure_time_range(Some(self.start), self.end)
    }
}
