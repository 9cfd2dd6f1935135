//! List Profiles Use Case
//!
//! Returns every profile of the account, provisioning the main profile
//! from the token identity on first access.

use std::sync::Arc;

use crate::application::config::MAIN_PROFILE_FALLBACK_NAME;
use crate::domain::entity::profile::Profile;
use crate::domain::repository::ProfileRepository;
use crate::domain::value_object::{
    account_id::AccountId, avatar_url::AvatarUrl, profile_name::ProfileName,
};
use crate::error::ProfileResult;

/// List profiles input
pub struct ListProfilesInput {
    /// Display name from the token identity, if any
    pub name: Option<String>,
    /// Avatar URL from the token identity, if any
    pub picture: Option<String>,
}

/// List profiles use case
pub struct ListProfilesUseCase<R>
where
    R: ProfileRepository,
{
    repo: Arc<R>,
}

impl<R> ListProfilesUseCase<R>
where
    R: ProfileRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        account_id: &AccountId,
        input: ListProfilesInput,
    ) -> ProfileResult<Vec<Profile>> {
        // Identity hints are best-effort: an unusable claim falls back
        // rather than failing the listing.
        let name = input
            .name
            .and_then(|n| ProfileName::new(n).ok())
            .unwrap_or_else(|| {
                ProfileName::new(MAIN_PROFILE_FALLBACK_NAME)
                    .expect("fallback profile name is valid")
            });

        let avatar_url = input.picture.and_then(|p| AvatarUrl::new(p).ok());

        let main = Profile::new_main(account_id.clone(), name, avatar_url);
        self.repo.create_main_if_absent(&main).await?;

        self.repo.list_for_account(account_id).await
    }
}
