//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::profile::Profile;

// ============================================================================
// Profile representation
// ============================================================================

/// Profile as exposed over the API
#[derive(Debug, Clone, Serialize)]
pub struct ProfileDto {
    pub id: Uuid,
    pub account_id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub is_main: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileDto {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.into_uuid(),
            account_id: profile.account_id.into_inner(),
            name: profile.name.into_inner(),
            avatar_url: profile.avatar_url.map(|a| a.into_inner()),
            is_main: profile.is_main,
            sort_order: profile.sort_order,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

// ============================================================================
// Listing
// ============================================================================

/// Profile listing response
#[derive(Debug, Clone, Serialize)]
pub struct ListProfilesResponse {
    pub profiles: Vec<ProfileDto>,
}

/// Single-profile response (create, update)
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub profile: ProfileDto,
}

// ============================================================================
// PIN lifecycle
// ============================================================================

/// PIN status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinStatusResponse {
    pub has_pin: bool,
}

/// Set PIN request
#[derive(Debug, Clone, Deserialize)]
pub struct SetPinRequest {
    pub pin: String,
}

/// Verify PIN request
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPinRequest {
    pub pin: String,
}

/// Verify PIN response
#[derive(Debug, Clone, Serialize)]
pub struct VerifyPinResponse {
    pub valid: bool,
}

/// Generic success response (pin/set, delete)
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// ============================================================================
// Profile mutation
// ============================================================================

/// Create profile request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileRequest {
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Update profile request
///
/// `pin` is required whenever the target is not the main profile and the
/// account has a PIN configured.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub pin: Option<String>,
}

/// Delete profile request
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeleteProfileRequest {
    pub pin: Option<String>,
}
