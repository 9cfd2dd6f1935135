//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use kernel::id::ProfileId;
use platform::token::{self, TokenClaims, TokenError};

use crate::application::config::ProfilesConfig;
use crate::application::{
    CreateProfileInput, CreateProfileUseCase, DeleteProfileInput, DeleteProfileUseCase,
    ListProfilesInput, ListProfilesUseCase, PinUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::repository::{PinRepository, ProfileRepository, VerifyAttemptsRepository};
use crate::domain::value_object::account_id::AccountId;
use crate::error::{ProfileError, ProfileResult};
use crate::presentation::dto::{
    CreateProfileRequest, DeleteProfileRequest, ListProfilesResponse, PinStatusResponse,
    ProfileDto, ProfileResponse, SetPinRequest, SuccessResponse, UpdateProfileRequest,
    VerifyPinRequest, VerifyPinResponse,
};

/// Shared state for profile handlers
#[derive(Clone)]
pub struct ProfilesAppState<R>
where
    R: ProfileRepository + PinRepository + VerifyAttemptsRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<ProfilesConfig>,
}

// ============================================================================
// Auth extraction
// ============================================================================

/// Resolve the requesting account from the Authorization header
fn authenticate(
    headers: &HeaderMap,
    config: &ProfilesConfig,
) -> ProfileResult<(AccountId, TokenClaims)> {
    let token = token::extract_bearer(headers)
        .ok_or(ProfileError::InvalidToken(TokenError::MissingBearer))?;

    let claims = token::verify_hs256(&token, &config.token_secret, Utc::now().timestamp())?;

    let account_id = AccountId::new(claims.sub.clone())
        .map_err(|e| ProfileError::InvalidAccount(e.to_string()))?;

    Ok((account_id, claims))
}

// ============================================================================
// Listing
// ============================================================================

/// GET /api/profiles
pub async fn list_profiles<R>(
    State(state): State<ProfilesAppState<R>>,
    headers: HeaderMap,
) -> ProfileResult<Json<ListProfilesResponse>>
where
    R: ProfileRepository + PinRepository + VerifyAttemptsRepository + Clone + Send + Sync + 'static,
{
    let (account_id, claims) = authenticate(&headers, &state.config)?;

    let use_case = ListProfilesUseCase::new(state.repo.clone());

    let input = ListProfilesInput {
        name: claims.name,
        picture: claims.picture,
    };

    let profiles = use_case.execute(&account_id, input).await?;

    Ok(Json(ListProfilesResponse {
        profiles: profiles.into_iter().map(ProfileDto::from).collect(),
    }))
}

// ============================================================================
// PIN lifecycle
// ============================================================================

/// GET /api/profiles/pin/status
pub async fn pin_status<R>(
    State(state): State<ProfilesAppState<R>>,
    headers: HeaderMap,
) -> ProfileResult<Json<PinStatusResponse>>
where
    R: ProfileRepository + PinRepository + VerifyAttemptsRepository + Clone + Send + Sync + 'static,
{
    let (account_id, _) = authenticate(&headers, &state.config)?;

    let use_case = PinUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let has_pin = use_case.status(&account_id).await?;

    Ok(Json(PinStatusResponse { has_pin }))
}

/// POST /api/profiles/pin/set
pub async fn set_pin<R>(
    State(state): State<ProfilesAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<SetPinRequest>,
) -> ProfileResult<Json<SuccessResponse>>
where
    R: ProfileRepository + PinRepository + VerifyAttemptsRepository + Clone + Send + Sync + 'static,
{
    let (account_id, _) = authenticate(&headers, &state.config)?;

    let use_case = PinUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    use_case.set(&account_id, req.pin).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/profiles/pin/verify
pub async fn verify_pin<R>(
    State(state): State<ProfilesAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<VerifyPinRequest>,
) -> ProfileResult<Json<VerifyPinResponse>>
where
    R: ProfileRepository + PinRepository + VerifyAttemptsRepository + Clone + Send + Sync + 'static,
{
    let (account_id, _) = authenticate(&headers, &state.config)?;

    let use_case = PinUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    use_case.verify(&account_id, req.pin).await?;

    Ok(Json(VerifyPinResponse { valid: true }))
}

// ============================================================================
// Profile mutation
// ============================================================================

/// POST /api/profiles
pub async fn create_profile<R>(
    State(state): State<ProfilesAppState<R>>,
    headers: HeaderMap,
    Json(req): Json<CreateProfileRequest>,
) -> ProfileResult<impl IntoResponse>
where
    R: ProfileRepository + PinRepository + VerifyAttemptsRepository + Clone + Send + Sync + 'static,
{
    let (account_id, _) = authenticate(&headers, &state.config)?;

    let use_case = CreateProfileUseCase::new(state.repo.clone());

    let input = CreateProfileInput {
        name: req.name,
        avatar_url: req.avatar_url,
    };

    let profile = use_case.execute(&account_id, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse {
            profile: ProfileDto::from(profile),
        }),
    ))
}

/// PATCH /api/profiles/{id}
pub async fn update_profile<R>(
    State(state): State<ProfilesAppState<R>>,
    headers: HeaderMap,
    Path(profile_id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> ProfileResult<Json<ProfileResponse>>
where
    R: ProfileRepository + PinRepository + VerifyAttemptsRepository + Clone + Send + Sync + 'static,
{
    let (account_id, _) = authenticate(&headers, &state.config)?;

    let pin_gate =
        PinUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());
    let use_case = UpdateProfileUseCase::new(state.repo.clone(), pin_gate);

    let input = UpdateProfileInput {
        profile_id: ProfileId::from_uuid(profile_id),
        name: req.name,
        avatar_url: req.avatar_url,
        pin: req.pin,
    };

    let profile = use_case.execute(&account_id, input).await?;

    Ok(Json(ProfileResponse {
        profile: ProfileDto::from(profile),
    }))
}

/// DELETE /api/profiles/{id}
pub async fn delete_profile<R>(
    State(state): State<ProfilesAppState<R>>,
    headers: HeaderMap,
    Path(profile_id): Path<Uuid>,
    body: Option<Json<DeleteProfileRequest>>,
) -> ProfileResult<Json<SuccessResponse>>
where
    R: ProfileRepository + PinRepository + VerifyAttemptsRepository + Clone + Send + Sync + 'static,
{
    let (account_id, _) = authenticate(&headers, &state.config)?;

    // Accounts without a PIN may send no body at all
    let req = body.map(|Json(b)| b).unwrap_or_default();

    let pin_gate =
        PinUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());
    let use_case = DeleteProfileUseCase::new(state.repo.clone(), pin_gate);

    let input = DeleteProfileInput {
        profile_id: ProfileId::from_uuid(profile_id),
        pin: req.pin,
    };

    use_case.execute(&account_id, input).await?;

    Ok(Json(SuccessResponse { success: true }))
}
