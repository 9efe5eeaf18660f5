use crate::model::ids::{CampaignId, LocationId, OrganizationId};
use crate::model::vocab::Hostility;
use crate::model::{ensure_not_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// A faction, guild, church or any other group.
///
/// `related` is symmetric like location neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub campaign_id: CampaignId,
    pub name: String,
    pub location: Option<LocationId>,
    pub hostility: Hostility,
    pub related: Vec<OrganizationId>,
    pub description: Option<String>,
}

impl Organization {
    pub fn new(campaign_id: CampaignId, name: impl Into<String>) -> Self {
        Self {
            id: OrganizationId::new(),
            campaign_id,
            name: name.into(),
            location: None,
            hostility: Hostility::default(),
            related: Vec::new(),
            description: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("organization name", &self.name)?;
        if self.related.contains(&self.id) {
            return Err(ValidationError::SelfReference {
                kind: "organization",
            });
        }
        Ok(())
    }
}
