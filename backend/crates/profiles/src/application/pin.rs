//! PIN Lifecycle Use Case
//!
//! Status, set, and rate-limited verification of the account PIN. The
//! same verification path gates non-main profile mutation.

use std::sync::Arc;

use chrono::Utc;
use platform::pin::{PinCredential, RawPin};

use crate::application::config::ProfilesConfig;
use crate::domain::entity::{account_pin::AccountPin, verify_attempts::VerifyAttempts};
use crate::domain::repository::{PinRepository, VerifyAttemptsRepository};
use crate::domain::value_object::account_id::AccountId;
use crate::error::{ProfileError, ProfileResult};

/// PIN lifecycle use case
pub struct PinUseCase<P, V>
where
    P: PinRepository,
    V: VerifyAttemptsRepository,
{
    pin_repo: Arc<P>,
    attempts_repo: Arc<V>,
    config: Arc<ProfilesConfig>,
}

impl<P, V> PinUseCase<P, V>
where
    P: PinRepository,
    V: VerifyAttemptsRepository,
{
    pub fn new(pin_repo: Arc<P>, attempts_repo: Arc<V>, config: Arc<ProfilesConfig>) -> Self {
        Self {
            pin_repo,
            attempts_repo,
            config,
        }
    }

    /// Whether a PIN is configured for the account
    pub async fn status(&self, account_id: &AccountId) -> ProfileResult<bool> {
        self.pin_repo.pin_exists(account_id).await
    }

    /// Set the account PIN, overwriting any existing credential
    ///
    /// No re-authentication is required: any holder of a valid bearer
    /// token can replace an existing PIN. Known gap, tracked in the
    /// DESIGN.md open questions.
    pub async fn set(&self, account_id: &AccountId, pin: String) -> ProfileResult<()> {
        let raw = RawPin::new(pin)?;
        let credential = PinCredential::derive(&raw);
        let entity = AccountPin::new(account_id.clone(), credential);

        self.pin_repo.upsert_pin(&entity).await?;

        tracing::info!(account_id = %account_id, "Account PIN set");

        Ok(())
    }

    /// Verify a PIN through the rate-limited path
    ///
    /// Order of checks, per the access-control design:
    /// 1. Format (`^\d{4}$`), before any store access
    /// 2. Attempt counter; an exhausted window rejects without touching
    ///    the credential
    /// 3. Constant-time digest comparison; success resets the counter,
    ///    failure increments it
    pub async fn verify(&self, account_id: &AccountId, pin: String) -> ProfileResult<()> {
        let raw = RawPin::new(pin)?;
        self.verify_raw(account_id, &raw).await
    }

    /// Gate a mutation of a non-main profile
    ///
    /// Accounts without a configured PIN are not gated. Otherwise the
    /// supplied code must pass the same rate-limited verification as
    /// the verify endpoint. Callers parse the code into a [`RawPin`]
    /// before any store access.
    pub async fn require_valid_pin(
        &self,
        account_id: &AccountId,
        supplied: Option<RawPin>,
    ) -> ProfileResult<()> {
        if !self.pin_repo.pin_exists(account_id).await? {
            return Ok(());
        }

        let raw = supplied.ok_or(ProfileError::PinRequired)?;
        self.verify_raw(account_id, &raw).await
    }

    async fn verify_raw(&self, account_id: &AccountId, pin: &RawPin) -> ProfileResult<()> {
        let now_ms = Utc::now().timestamp_millis();
        let rate_limit = &self.config.pin_rate_limit;

        let attempts = self.attempts_repo.find_attempts(account_id).await?;

        if let Some(ref current) = attempts {
            if current.is_exhausted(now_ms, rate_limit) {
                let retry_after_secs =
                    rate_limit.retry_after_secs(current.window_start_ms, now_ms);
                tracing::warn!(
                    account_id = %account_id,
                    attempts = current.attempts_count,
                    "PIN verification blocked by rate limit"
                );
                return Err(ProfileError::TooManyAttempts { retry_after_secs });
            }
        }

        let stored = self
            .pin_repo
            .find_pin(account_id)
            .await?
            .ok_or(ProfileError::PinNotSet)?;

        if stored.verify(pin) {
            self.attempts_repo.reset_attempts(account_id).await?;
            tracing::info!(account_id = %account_id, "PIN verified");
            return Ok(());
        }

        let updated = match attempts {
            Some(mut current) => {
                current.record_failure(now_ms, rate_limit.window_ms());
                current
            }
            None => VerifyAttempts::first_failure(account_id.clone(), now_ms),
        };

        self.attempts_repo.save_attempts(&updated).await?;

        tracing::warn!(
            account_id = %account_id,
            attempts = updated.attempts_count,
            "PIN verification failed"
        );

        Err(ProfileError::WrongPin)
    }
}
