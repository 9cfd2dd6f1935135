//! PIN Handling and Verification
//!
//! Household profile PINs are 4-digit numeric codes with:
//! - Strict format validation before anything touches storage
//! - Zeroization of the clear-text code
//! - Salted SHA-256 digests with per-credential random salts
//! - Constant-time comparison
//!
//! A 4-digit space cannot be made brute-force resistant by the hash
//! function; the store-backed attempt limiter is the actual guard.

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{constant_time_eq, from_base64, random_bytes, salted_sha256, to_base64};

// ============================================================================
// Constants
// ============================================================================

/// Exact PIN length in digits
pub const PIN_LENGTH: usize = 4;

/// Salt length in bytes (128 bits)
pub const SALT_LENGTH: usize = 16;

// ============================================================================
// Error Types
// ============================================================================

/// PIN format violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PinPolicyError {
    /// PIN has the wrong number of characters
    #[error("PIN must be exactly {expected} digits (got {actual})")]
    WrongLength { expected: usize, actual: usize },

    /// PIN contains a non-digit character
    #[error("PIN must contain only digits 0-9")]
    NonDigit,
}

/// PIN credential decoding errors
#[derive(Debug, Error)]
pub enum PinCredentialError {
    /// Stored salt or hash is not valid base64
    #[error("Stored PIN credential is not valid base64")]
    InvalidEncoding,

    /// Stored hash has an unexpected length
    #[error("Stored PIN hash has an unexpected length")]
    InvalidHashLength,
}

// ============================================================================
// Clear Text PIN (Zeroized on drop)
// ============================================================================

/// Clear text PIN with automatic memory zeroization
///
/// Guarantees the code matches `^\d{4}$` and is erased from memory when
/// dropped. Does not implement `Clone`; Debug output is redacted.
///
/// ## Examples
/// ```rust
/// use platform::pin::RawPin;
///
/// let pin = RawPin::new("1234".to_string()).unwrap();
/// assert!(RawPin::new("12a4".to_string()).is_err());
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RawPin(String);

impl RawPin {
    /// Create a new clear text PIN, validating the `^\d{4}$` format
    ///
    /// No trimming or normalization is applied; the code must be exactly
    /// four ASCII digits as received.
    pub fn new(raw: String) -> Result<Self, PinPolicyError> {
        let char_count = raw.chars().count();
        if char_count != PIN_LENGTH {
            return Err(PinPolicyError::WrongLength {
                expected: PIN_LENGTH,
                actual: char_count,
            });
        }

        if !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(PinPolicyError::NonDigit);
        }

        Ok(Self(raw))
    }

    /// Get the PIN as bytes for hashing
    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for RawPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPin").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// PIN Credential (Safe to store)
// ============================================================================

/// Salted PIN digest, stored as two base64 text columns
///
/// The salt is generated fresh for every `derive` call, so setting the
/// same code twice produces different stored credentials.
///
/// ## Examples
/// ```rust
/// use platform::pin::{PinCredential, RawPin};
///
/// let pin = RawPin::new("1234".to_string()).unwrap();
/// let credential = PinCredential::derive(&pin);
/// assert!(credential.verify(&pin));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PinCredential {
    salt: Vec<u8>,
    hash: [u8; 32],
}

impl PinCredential {
    /// Derive a new credential from a clear text PIN with a fresh salt
    pub fn derive(pin: &RawPin) -> Self {
        let salt = random_bytes(SALT_LENGTH);
        let hash = salted_sha256(&salt, pin.as_bytes());
        Self { salt, hash }
    }

    /// Reconstruct a credential from stored base64 columns
    pub fn from_stored(salt_b64: &str, hash_b64: &str) -> Result<Self, PinCredentialError> {
        let salt = from_base64(salt_b64).map_err(|_| PinCredentialError::InvalidEncoding)?;
        let hash_bytes = from_base64(hash_b64).map_err(|_| PinCredentialError::InvalidEncoding)?;

        let hash: [u8; 32] = hash_bytes
            .try_into()
            .map_err(|_| PinCredentialError::InvalidHashLength)?;

        Ok(Self { salt, hash })
    }

    /// Verify a clear text PIN against this credential
    ///
    /// Uses constant-time comparison of the digests.
    pub fn verify(&self, pin: &RawPin) -> bool {
        let candidate = salted_sha256(&self.salt, pin.as_bytes());
        constant_time_eq(&candidate, &self.hash)
    }

    /// Salt encoded for storage
    pub fn salt_b64(&self) -> String {
        to_base64(&self.salt)
    }

    /// Digest encoded for storage
    pub fn hash_b64(&self) -> String {
        to_base64(&self.hash)
    }
}

impl fmt::Debug for PinCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinCredential")
            .field("salt", &"[SALT]")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
