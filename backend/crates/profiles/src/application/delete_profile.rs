//! Delete Profile Use Case
//!
//! Removes a secondary household profile. The main profile is
//! unconditionally protected.

use std::sync::Arc;

use kernel::id::ProfileId;
use platform::pin::RawPin;

use crate::application::pin::PinUseCase;
use crate::domain::repository::{PinRepository, ProfileRepository, VerifyAttemptsRepository};
use crate::domain::value_object::account_id::AccountId;
use crate::error::{ProfileError, ProfileResult};

/// Delete profile input
pub struct DeleteProfileInput {
    /// Target profile
    pub profile_id: ProfileId,
    /// PIN gating the deletion
    pub pin: Option<String>,
}

/// Delete profile use case
pub struct DeleteProfileUseCase<R, P, V>
where
    R: ProfileRepository,
    P: PinRepository,
    V: VerifyAttemptsRepository,
{
    repo: Arc<R>,
    pin_gate: PinUseCase<P, V>,
}

impl<R, P, V> DeleteProfileUseCase<R, P, V>
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
        input: DeleteProfileInput,
    ) -> ProfileResult<()> {
        // Validate before any store access
        let pin = input.pin.map(RawPin::new).transpose()?;

        let profile = self
            .repo
            .find_by_id(account_id, input.profile_id)
            .await?
            .ok_or(ProfileError::ProfileNotFound)?;

        if !profile.is_deletable() {
            return Err(ProfileError::MainProfileProtected);
        }

        self.pin_gate.require_valid_pin(account_id, pin).await?;

        self.repo.delete(account_id, input.profile_id).await?;

        tracing::info!(
            account_id = %account_id,
            profile_id = %input.profile_id,
            "Profile deleted"
        );

        Ok(())
    }
}
