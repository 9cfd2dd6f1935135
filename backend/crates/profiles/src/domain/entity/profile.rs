//! Profile Entity
//!
//! A household sub-identity under one account. Exactly one profile per
//! account is the main profile, mirroring the account itself.

use chrono::{DateTime, Utc};
use kernel::id::ProfileId;

use crate::domain::value_object::{
    account_id::AccountId, avatar_url::AvatarUrl, profile_name::ProfileName,
};

/// Household profile entity
#[derive(Debug, Clone)]
pub struct Profile {
    /// Profile identifier
    pub id: ProfileId,
    /// Owning account (bearer subject)
    pub account_id: AccountId,
    /// Display name
    pub name: ProfileName,
    /// Optional avatar image URL
    pub avatar_url: Option<AvatarUrl>,
    /// Whether this is the account's main profile
    pub is_main: bool,
    /// Position within the account's profile list (main profile is 0)
    pub sort_order: i32,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Sort order reserved for the main profile
    pub const MAIN_SORT_ORDER: i32 = 0;

    /// Create the account's main profile
    pub fn new_main(account_id: AccountId, name: ProfileName, avatar_url: Option<AvatarUrl>) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            account_id,
            name,
            avatar_url,
            is_main: true,
            sort_order: Self::MAIN_SORT_ORDER,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a secondary household profile
    pub fn new_member(
        account_id: AccountId,
        name: ProfileName,
        avatar_url: Option<AvatarUrl>,
        sort_order: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            account_id,
            name,
            avatar_url,
            is_main: false,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change the display name
    pub fn rename(&mut self, name: ProfileName) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Change the avatar
    pub fn set_avatar(&mut self, avatar_url: Option<AvatarUrl>) {
        self.avatar_url = avatar_url;
        self.updated_at = Utc::now();
    }

    /// Whether mutation of this profile is PIN-gated
    ///
    /// The main profile is freely editable by its owner; every other
    /// profile is gated.
    pub fn requires_pin(&self) -> bool {
        !self.is_main
    }

    /// Whether this profile can ever be deleted
    pub fn is_deletable(&self) -> bool {
        !self.is_main
    }
}
