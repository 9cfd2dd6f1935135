//! Create Profile Use Case
//!
//! Adds a secondary household profile. Creation is not PIN-gated; only
//! mutation of existing secondary profiles is.

use std::sync::Arc;

use crate::domain::entity::profile::Profile;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::{
    account_id::AccountId, avatar_url::AvatarUrl, profile_name::ProfileName,
};
use crate::error::{ProfileError, ProfileResult};

/// Create profile input
pub struct CreateProfileInput {
    /// Display name (required, 1-100 chars)
    pub name: String,
    /// Optional avatar URL
    pub avatar_url: Option<String>,
}

/// Create profile use case
pub struct CreateProfileUseCase<R>
where
    R: ProfileRepository,
{
    repo: Arc<R>,
}

impl<R> CreateProfileUseCase<R>
where
    R: ProfileRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        account_id: &AccountId,
        input: CreateProfileInput,
    ) -> ProfileResult<Profile> {
        // Validate before any store access
        let name = ProfileName::new(&input.name)
            .map_err(|e| ProfileError::InvalidName(e.to_string()))?;

        let avatar_url = input
            .avatar_url
            .map(AvatarUrl::new)
            .transpose()
            .map_err(|e| ProfileError::InvalidAvatarUrl(e.to_string()))?;

        let sort_order = self.repo.next_sort_order(account_id).await?;

        let profile = Profile::new_member(account_id.clone(), name, avatar_url, sort_order);
        self.repo.create(&profile).await?;

        tracing::info!(
            account_id = %account_id,
            profile_id = %profile.id,
            sort_order = sort_order,
            "Profile created"
        );

        Ok(profile)
    }
}
