//! Account PIN Entity
//!
//! The single PIN credential of an account, gating mutation of
//! non-main profiles. Separated from Profile to isolate sensitive data.

use chrono::{DateTime, Utc};
use platform::pin::{PinCredential, RawPin};

use crate::domain::value_object::account_id::AccountId;

/// PIN credential entity (at most one per account)
#[derive(Debug, Clone)]
pub struct AccountPin {
    /// Owning account
    pub account_id: AccountId,
    /// Salted digest
    pub credential: PinCredential,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl AccountPin {
    /// Create a new PIN credential for an account
    pub fn new(account_id: AccountId, credential: PinCredential) -> Self {
        let now = Utc::now();
        Self {
            account_id,
            credential,
            created_at: now,
            updated_at: now,
        }
    }

    /// Verify a clear text PIN against the stored credential
    pub fn verify(&self, pin: &RawPin) -> bool {
        self.credential.verify(pin)
    }
}
