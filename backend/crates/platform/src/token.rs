//! Bearer Token Verification
//!
//! Extraction of `Authorization: Bearer` credentials and verification of
//! HS256-signed JWTs. The subject claim identifies the account; callers
//! interpret the remaining claims.
//!
//! Signature checking uses [`crate::crypto::hmac_sha256`] with a
//! constant-time comparison over the raw signature bytes.

use http::{HeaderMap, header};
use serde::Deserialize;
use thiserror::Error;

use crate::crypto::{constant_time_eq, from_base64url, hmac_sha256, to_base64url};

// ============================================================================
// Error Types
// ============================================================================

/// Token extraction/verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Authorization header absent or not a Bearer credential
    #[error("Missing bearer token")]
    MissingBearer,

    /// Token is not three base64url segments
    #[error("Malformed token")]
    Malformed,

    /// Token header declares an algorithm other than HS256
    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Signature does not match the signing input
    #[error("Invalid token signature")]
    InvalidSignature,

    /// `exp` claim is in the past
    #[error("Token has expired")]
    Expired,

    /// Payload is not valid JSON or misses required claims
    #[error("Invalid token claims: {0}")]
    InvalidClaims(String),
}

// ============================================================================
// Claims
// ============================================================================

/// Claims carried by a verified bearer token
///
/// `sub` is the account id. `name`/`picture` are the identity hints used
/// to provision the main household profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Subject - the account id
    pub sub: String,
    /// Display name from the identity provider
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL from the identity provider
    #[serde(default)]
    pub picture: Option<String>,
    /// Expiry as Unix seconds
    #[serde(default)]
    pub exp: Option<i64>,
}

#[derive(Deserialize)]
struct TokenHeader {
    alg: String,
}

// ============================================================================
// Extraction and verification
// ============================================================================

/// Extract the bearer credential from request headers
///
/// Accepts `Bearer` and `bearer` prefixes; returns `None` for an absent
/// header or an empty credential.
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Verify an HS256 token and return its claims
///
/// ## Arguments
/// * `token` - Compact JWT (`header.payload.signature`)
/// * `secret` - 32-byte HMAC key
/// * `now_secs` - Current Unix time, checked against `exp` when present
pub fn verify_hs256(
    token: &str,
    secret: &[u8; 32],
    now_secs: i64,
) -> Result<TokenClaims, TokenError> {
    let mut segments = token.split('.');
    let (header_b64, payload_b64, signature_b64) = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(h), Some(p), Some(s), None) => (h, p, s),
        _ => return Err(TokenError::Malformed),
    };

    let header_bytes = from_base64url(header_b64).map_err(|_| TokenError::Malformed)?;
    let token_header: TokenHeader =
        serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;
    if token_header.alg != "HS256" {
        return Err(TokenError::UnsupportedAlgorithm(token_header.alg));
    }

    let signature = from_base64url(signature_b64).map_err(|_| TokenError::Malformed)?;
    let signing_input = format!("{header_b64}.{payload_b64}");
    let expected = hmac_sha256(secret, signing_input.as_bytes());

    if !constant_time_eq(&signature, &expected) {
        return Err(TokenError::InvalidSignature);
    }

    let payload_bytes = from_base64url(payload_b64).map_err(|_| TokenError::Malformed)?;
    let claims: TokenClaims = serde_json::from_slice(&payload_bytes)
        .map_err(|e| TokenError::InvalidClaims(e.to_string()))?;

    if claims.sub.is_empty() {
        return Err(TokenError::InvalidClaims("empty subject".to_string()));
    }

    if let Some(exp) = claims.exp {
        if exp <= now_secs {
            return Err(TokenError::Expired);
        }
    }

    Ok(claims)
}

/// Sign claims as an HS256 token
///
/// Counterpart of [`verify_hs256`] for local tooling and tests.
pub fn sign_hs256(claims: &serde_json::Value, secret: &[u8; 32]) -> String {
    let header_b64 = to_base64url(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload_b64 = to_base64url(claims.to_string().as_bytes());
    let signing_input = format!("{header_b64}.{payload_b64}");
    let signature = hmac_sha256(secret, signing_input.as_bytes());
    format!("{signing_input}.{}", to_base64url(&signature))
}
