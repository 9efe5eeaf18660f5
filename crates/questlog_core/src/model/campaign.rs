//! Users and campaigns.
//!
//! A user belongs to a campaign when they run it (dungeon master) or have
//! been approved as a member. Membership is the only access notion modelled
//! here; visibility of public campaigns is left to the surrounding layer.

use crate::model::ids::{CampaignId, UserId};
use crate::model::{ensure_not_blank, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Unique across the store.
    pub username: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("username", &self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    /// Dungeon master running the campaign.
    pub dm: UserId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    /// Approved users besides the dungeon master.
    pub members: Vec<UserId>,
}

impl Campaign {
    pub fn new(dm: UserId, name: impl Into<String>) -> Self {
        Self {
            id: CampaignId::new(),
            dm,
            name: name.into(),
            description: None,
            is_public: false,
            members: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("campaign name", &self.name)
    }

    /// Returns whether `user` runs or has been approved for this campaign.
    pub fn has_member(&self, user: UserId) -> bool {
        self.dm == user || self.members.contains(&user)
    }
}
