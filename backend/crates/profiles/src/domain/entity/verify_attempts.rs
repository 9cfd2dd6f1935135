//! Verify Attempts Entity
//!
//! Fixed-window counter of failed PIN verifications, keyed by account and
//! shared across every profile under it. Persisted rather than held
//! in-process so the limit holds across stateless instances.

use platform::rate_limit::RateLimitConfig;

use crate::domain::value_object::account_id::AccountId;

/// Failed-verification counter for one account
#[derive(Debug, Clone)]
pub struct VerifyAttempts {
    /// Owning account
    pub account_id: AccountId,
    /// Failures recorded in the current window
    pub attempts_count: u32,
    /// Window start as Unix milliseconds
    pub window_start_ms: i64,
}

impl VerifyAttempts {
    /// Start a new window with one recorded failure
    pub fn first_failure(account_id: AccountId, now_ms: i64) -> Self {
        Self {
            account_id,
            attempts_count: 1,
            window_start_ms: now_ms,
        }
    }

    /// Whether the window that started at `window_start_ms` has elapsed
    pub fn window_expired(&self, now_ms: i64, window_ms: i64) -> bool {
        now_ms.saturating_sub(self.window_start_ms) >= window_ms
    }

    /// Whether verification must be rejected without touching the credential
    ///
    /// True when the attempt cap is reached inside a still-open window.
    /// An expired window never blocks; the next failure restarts it.
    pub fn is_exhausted(&self, now_ms: i64, config: &RateLimitConfig) -> bool {
        !self.window_expired(now_ms, config.window_ms())
            && self.attempts_count >= config.max_attempts
    }

    /// Record one more failed verification
    ///
    /// Restarts the window when the previous one has elapsed.
    pub fn record_failure(&mut self, now_ms: i64, window_ms: i64) {
        if self.window_expired(now_ms, window_ms) {
            self.attempts_count = 1;
            self.window_start_ms = now_ms;
        } else {
            self.attempts_count += 1;
        }
    }
}
