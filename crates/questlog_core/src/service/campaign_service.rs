//! User and campaign use-case service.
//!
//! # Invariants
//! - Usernames are trimmed and unique (case-insensitive).
//! - A campaign's dungeon master must be an existing user.
//! - Only existing users can be approved as members.

use crate::model::campaign::{Campaign, User};
use crate::model::ids::{CampaignId, UserId};
use crate::model::vocab::RecordKind;
use crate::repo::CampaignRepository;
use crate::service::input::{optional_text, required};
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Campaign service facade over repository implementations.
pub struct CampaignService<R: CampaignRepository> {
    repo: R,
}

impl<R: CampaignRepository> CampaignService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a user with a unique username.
    pub fn register_user(&self, username: &str) -> ServiceResult<User> {
        let username = required("username", username)?;
        if self.repo.find_user_by_name(&username)?.is_some() {
            return Err(ServiceError::UsernameTaken(username));
        }
        let user = User::new(username);
        self.repo.create_user(&user)?;
        info!("event=user_register module=service status=ok user={}", user.id);
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> ServiceResult<User> {
        self.repo
            .get_user(id)?
            .ok_or_else(|| ServiceError::missing(RecordKind::User, id))
    }

    pub fn find_user(&self, username: &str) -> ServiceResult<Option<User>> {
        Ok(self.repo.find_user_by_name(username)?)
    }

    /// Creates a campaign run by `dm`.
    pub fn create_campaign(
        &self,
        dm: UserId,
        name: &str,
        description: Option<&str>,
        is_public: bool,
    ) -> ServiceResult<Campaign> {
        self.get_user(dm)?;
        let mut campaign = Campaign::new(dm, required("campaign name", name)?);
        campaign.description = optional_text(description);
        campaign.is_public = is_public;
        self.repo.create_campaign(&campaign)?;
        info!(
            "event=campaign_create module=service status=ok campaign={} dm={}",
            campaign.id, dm
        );
        Ok(campaign)
    }

    pub fn get_campaign(&self, id: CampaignId) -> ServiceResult<Campaign> {
        self.repo
            .get_campaign(id)?
            .ok_or_else(|| ServiceError::missing(RecordKind::Campaign, id))
    }

    /// Campaigns `user` runs or plays in.
    pub fn list_campaigns(&self, user: UserId) -> ServiceResult<Vec<Campaign>> {
        self.get_user(user)?;
        Ok(self.repo.list_campaigns_for(user)?)
    }

    /// Approves `user` as a member. Approving the dungeon master or an
    /// existing member is a no-op.
    pub fn approve_member(&self, campaign: CampaignId, user: UserId) -> ServiceResult<Campaign> {
        let existing = self.get_campaign(campaign)?;
        self.get_user(user)?;
        if !existing.has_member(user) {
            self.repo.add_member(campaign, user)?;
            info!(
                "event=campaign_member_add module=service status=ok campaign={campaign} user={user}"
            );
        }
        self.get_campaign(campaign)
    }

    /// Dungeon master first, then approved members in approval order.
    pub fn list_members(&self, campaign: CampaignId) -> ServiceResult<Vec<User>> {
        let campaign = self.get_campaign(campaign)?;
        std::iter::once(campaign.dm)
            .chain(campaign.members)
            .map(|user| self.get_user(user))
            .collect()
    }

    pub fn is_member(&self, campaign: CampaignId, user: UserId) -> ServiceResult<bool> {
        Ok(self.repo.is_member(campaign, user)?)
    }

    /// Deletes the campaign and everything recorded in it.
    pub fn delete_campaign(&self, campaign: CampaignId) -> ServiceResult<()> {
        self.repo.delete_campaign(campaign)?;
        info!("event=campaign_delete module=service status=ok campaign={campaign}");
        Ok(())
    }
}
