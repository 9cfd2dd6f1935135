//! Profiles Error Types
//!
//! This module provides profile-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::pin::{PinCredentialError, PinPolicyError};
use platform::token::TokenError;
use thiserror::Error;

/// Generic message returned to clients for unexpected persistence failures.
/// The product UI is French-first; internal detail is only logged.
const INTERNAL_ERROR_MESSAGE: &str = "Une erreur interne est survenue";

/// Profiles-specific result type alias
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Profiles-specific error variants
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Bearer token missing, malformed, or failing verification
    #[error("Invalid bearer token")]
    InvalidToken(#[from] TokenError),

    /// Token subject claim is unusable as an account id
    #[error("Invalid account identity: {0}")]
    InvalidAccount(String),

    /// Profile name validation failed
    #[error("Invalid profile name: {0}")]
    InvalidName(String),

    /// Avatar URL validation failed
    #[error("Invalid avatar URL: {0}")]
    InvalidAvatarUrl(String),

    /// PIN does not match the 4-digit format
    #[error("Invalid PIN format: {0}")]
    InvalidPinFormat(#[from] PinPolicyError),

    /// A PIN is configured but the request did not supply one
    #[error("A PIN is required for this operation")]
    PinRequired,

    /// Verification requested but no PIN is configured
    #[error("No PIN is configured for this account")]
    PinNotSet,

    /// Supplied PIN does not match the stored credential
    #[error("Incorrect PIN")]
    WrongPin,

    /// Verification attempts exhausted for the current window
    #[error("Too many PIN attempts")]
    TooManyAttempts { retry_after_secs: u64 },

    /// Profile does not exist or belongs to another account
    #[error("Profile not found")]
    ProfileNotFound,

    /// The main profile cannot be deleted
    #[error("The main profile is protected")]
    MainProfileProtected,

    /// Stored PIN credential could not be decoded
    #[error("Stored PIN credential is corrupt")]
    CorruptCredential(#[from] PinCredentialError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProfileError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProfileError::InvalidToken(_) | ProfileError::InvalidAccount(_) => {
                StatusCode::UNAUTHORIZED
            }
            ProfileError::InvalidName(_)
            | ProfileError::InvalidAvatarUrl(_)
            | ProfileError::InvalidPinFormat(_)
            | ProfileError::PinRequired => StatusCode::BAD_REQUEST,
            ProfileError::PinNotSet
            | ProfileError::WrongPin
            | ProfileError::MainProfileProtected => StatusCode::FORBIDDEN,
            ProfileError::TooManyAttempts { .. } => StatusCode::TOO_MANY_REQUESTS,
            ProfileError::ProfileNotFound => StatusCode::NOT_FOUND,
            ProfileError::CorruptCredential(_)
            | ProfileError::Database(_)
            | ProfileError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProfileError::InvalidToken(_) | ProfileError::InvalidAccount(_) => {
                ErrorKind::Unauthorized
            }
            ProfileError::InvalidName(_)
            | ProfileError::InvalidAvatarUrl(_)
            | ProfileError::InvalidPinFormat(_)
            | ProfileError::PinRequired => ErrorKind::BadRequest,
            ProfileError::PinNotSet
            | ProfileError::WrongPin
            | ProfileError::MainProfileProtected => ErrorKind::Forbidden,
            ProfileError::TooManyAttempts { .. } => ErrorKind::TooManyRequests,
            ProfileError::ProfileNotFound => ErrorKind::NotFound,
            ProfileError::CorruptCredential(_)
            | ProfileError::Database(_)
            | ProfileError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// 5xx errors collapse to one generic client message; the real cause
    /// never leaves the server.
    pub fn to_app_error(&self) -> AppError {
        match self {
            ProfileError::CorruptCredential(_)
            | ProfileError::Database(_)
            | ProfileError::Internal(_) => AppError::internal(INTERNAL_ERROR_MESSAGE),
            ProfileError::TooManyAttempts { retry_after_secs } => {
                AppError::new(self.kind(), self.to_string())
                    .with_action(format!("Retry in {retry_after_secs} seconds"))
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ProfileError::Database(e) => {
                tracing::error!(error = %e, "Profiles database error");
            }
            ProfileError::CorruptCredential(e) => {
                tracing::error!(error = %e, "Stored PIN credential is corrupt");
            }
            ProfileError::Internal(msg) => {
                tracing::error!(message = %msg, "Profiles internal error");
            }
            ProfileError::WrongPin => {
                tracing::warn!("PIN verification failed");
            }
            ProfileError::TooManyAttempts { retry_after_secs } => {
                tracing::warn!(
                    retry_after_secs = retry_after_secs,
                    "PIN verification rate limit exceeded"
                );
            }
            _ => {
                tracing::debug!(error = %self, "Profiles error");
            }
        }
    }
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
