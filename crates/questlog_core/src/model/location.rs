use crate::model::ids::{CampaignId, LocationId};
use crate::model::vocab::Hostility;
use crate::model::{ensure_not_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// A place in the campaign world.
///
/// Neighborhood is symmetric: storing `b` as a neighbor of `a` makes `a` a
/// neighbor of `b` as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub campaign_id: CampaignId,
    pub name: String,
    pub hostility: Hostility,
    pub neighbors: Vec<LocationId>,
    pub description: Option<String>,
}

impl Location {
    pub fn new(campaign_id: CampaignId, name: impl Into<String>) -> Self {
        Self {
            id: LocationId::new(),
            campaign_id,
            name: name.into(),
            hostility: Hostility::default(),
            neighbors: Vec::new(),
            description: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("location name", &self.name)?;
        if self.neighbors.contains(&self.id) {
            return Err(ValidationError::SelfReference { kind: "location" });
        }
        Ok(())
    }
}
