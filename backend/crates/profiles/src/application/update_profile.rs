//! Update Profile Use Case
//!
//! Renames a profile or changes its avatar. The main profile is freely
//! editable by its owner; every other profile is PIN-gated through the
//! rate-limited verification path.

use std::sync::Arc;

use kernel::id::ProfileId;
use platform::pin::RawPin;

use crate::application::pin::PinUseCase;
use crate::domain::entity::profile::Profile;
use crate::domain::repository::{PinRepository, ProfileRepository, VerifyAttemptsRepository};
use crate::domain::value_object::{
    account_id::AccountId, avatar_url::AvatarUrl, profile_name::ProfileName,
};
use crate::error::{ProfileError, ProfileResult};

/// Update profile input
pub struct UpdateProfileInput {
    /// Target profile
    pub profile_id: ProfileId,
    /// New display name, unchanged when absent
    pub name: Option<String>,
    /// New avatar URL, unchanged when absent
    pub avatar_url: Option<String>,
    /// PIN gating the mutation of non-main profiles
    pub pin: Option<String>,
}

/// Update profile use case
pub struct UpdateProfileUseCase<R, P, V>
where
    R: ProfileRepository,
    P: PinRepository,
    V: VerifyAttemptsRepository,
{
    repo: Arc<R>,
    pin_gate: PinUseCase<P, V>,
}

impl<R, P, V> UpdateProfileUseCase<R, P, V>
where
    R: ProfileRepository,
    P: PinRepository,
    V: VerifyAttemptsRepository,
{
    pub fn new(repo: Arc<R>, pin_gate: PinUseCase<P, V>) -> Self {
        Self { repo, pin_gate }
    }

    pub async fn execute(
        &self,
        account_id: &AccountId,
        input: UpdateProfileInput,
    ) -> ProfileResult<Profile> {
        // Validate before any store access
        let name = input
            .name
            .map(|n| ProfileName::new(n).map_err(|e| ProfileError::InvalidName(e.to_string())))
            .transpose()?;

        let avatar_url = input
            .avatar_url
            .map(|a| AvatarUrl::new(a).map_err(|e| ProfileError::InvalidAvatarUrl(e.to_string())))
            .transpose()?;

        let pin = input.pin.map(RawPin::new).transpose()?;

        let mut profile = self
            .repo
            .find_by_id(account_id, input.profile_id)
            .await?
            .ok_or(ProfileError::ProfileNotFound)?;

        if profile.requires_pin() {
            self.pin_gate.require_valid_pin(account_id, pin).await?;
        }

        if let Some(name) = name {
            profile.rename(name);
        }
        if let Some(avatar_url) = avatar_url {
            profile.set_avatar(Some(avatar_url));
        }

        self.repo.update(&profile).await?;

        tracing::info!(
            account_id = %account_id,
            profile_id = %profile.id,
            is_main = profile.is_main,
            "Profile updated"
        );

        Ok(profile)
    }
}
