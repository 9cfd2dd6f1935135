//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::ProfileId;

use crate::domain::entity::{
    account_pin::AccountPin, profile::Profile, verify_attempts::VerifyAttempts,
};
use crate::domain::value_object::account_id::AccountId;
use crate::error::ProfileResult;

/// Profile repository trait
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    /// Create a new profile
    async fn create(&self, profile: &Profile) -> ProfileResult<()>;

    /// Create the account's main profile unless one already exists
    ///
    /// Idempotent; the concurrent-first-request race is absorbed by the
    /// store's uniqueness constraint.
    async fn create_main_if_absent(&self, profile: &Profile) -> ProfileResult<()>;

    /// Find a profile by id, scoped to its owning account
    async fn find_by_id(
        &self,
        account_id: &AccountId,
        profile_id: ProfileId,
    ) -> ProfileResult<Option<Profile>>;

    /// List all profiles of an account, main first, then sort order,
    /// then creation time
    async fn list_for_account(&self, account_id: &AccountId) -> ProfileResult<Vec<Profile>>;

    /// Next free sort order for the account (`MAX + 1`)
    async fn next_sort_order(&self, account_id: &AccountId) -> ProfileResult<i32>;

    /// Update a profile's name and avatar
    async fn update(&self, profile: &Profile) -> ProfileResult<()>;

    /// Delete a profile, scoped to its owning account
    async fn delete(&self, account_id: &AccountId, profile_id: ProfileId) -> ProfileResult<()>;
}

/// PIN credential repository trait
#[trait_variant::make(PinRepository: Send)]
pub trait LocalPinRepository {
    /// Find the account's PIN credential
    async fn find_pin(&self, account_id: &AccountId) -> ProfileResult<Option<AccountPin>>;

    /// Insert or overwrite the account's PIN credential
    async fn upsert_pin(&self, pin: &AccountPin) -> ProfileResult<()>;

    /// Check whether a PIN is configured for the account
    async fn pin_exists(&self, account_id: &AccountId) -> ProfileResult<bool>;
}

/// Verification attempt counter repository trait
#[trait_variant::make(VerifyAttemptsRepository: Send)]
pub trait LocalVerifyAttemptsRepository {
    /// Find the account's attempt counter
    async fn find_attempts(
        &self,
        account_id: &AccountId,
    ) -> ProfileResult<Option<VerifyAttempts>>;

    /// Insert or replace the account's attempt counter
    async fn save_attempts(&self, attempts: &VerifyAttempts) -> ProfileResult<()>;

    /// Clear the account's attempt counter
    async fn reset_attempts(&self, account_id: &AccountId) -> ProfileResult<()>;
}
