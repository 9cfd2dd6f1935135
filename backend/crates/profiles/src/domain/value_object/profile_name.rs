//! Profile Name Value Object
//!
//! プロフィール名は世帯メンバーを区別するための表示名。
//!
//! ## 設計方針
//! - NFKC正規化 → trim → 検証 の順で処理
//! - 表示名なので Unicode を広く許可（制御文字のみ禁止）
//!
//! ## 不変条件
//! - 長さ: 1〜100文字（正規化・trim後）
//! - 制御文字禁止

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for a profile name (in characters)
pub const PROFILE_NAME_MIN_LENGTH: usize = 1;

/// Maximum length for a profile name (in characters)
pub const PROFILE_NAME_MAX_LENGTH: usize = 100;

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when profile name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileNameError {
    /// Name is empty after normalization and trimming
    Empty,

    /// Name is too long (maximum: PROFILE_NAME_MAX_LENGTH)
    TooLong { length: usize, max: usize },

    /// Name contains a control character
    InvalidCharacter,
}

impl fmt::Display for ProfileNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Profile name cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "Profile name is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter => {
                write!(f, "Profile name cannot contain control characters")
            }
        }
    }
}

impl std::error::Error for ProfileNameError {}

// ============================================================================
// ProfileName Value Object
// ============================================================================

/// Validated, normalized profile name
///
/// # Invariants
/// - Non-empty after NFKC normalization and trimming
/// - At most [`PROFILE_NAME_MAX_LENGTH`] characters
/// - No control characters
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfileName(String);

impl ProfileName {
    /// Create a new ProfileName from raw input
    ///
    /// Applies NFKC normalization and trimming, then validates.
    pub fn new(input: impl AsRef<str>) -> Result<Self, ProfileNameError> {
        let normalized = Self::normalize(input.as_ref());
        Self::validate(&normalized)?;
        Ok(Self(normalized))
    }

    /// Get the profile name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(name: &str) -> Result<Self, ProfileNameError> {
        Self::validate(name)?;
        Ok(Self(name.to_string()))
    }

    /// Normalize input string (NFKC and trim)
    fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }

    /// Validate the normalized profile name
    fn validate(name: &str) -> Result<(), ProfileNameError> {
        if name.is_empty() {
            return Err(ProfileNameError::Empty);
        }

        let length = name.chars().count();
        if length > PROFILE_NAME_MAX_LENGTH {
            return Err(ProfileNameError::TooLong {
                length,
                max: PROFILE_NAME_MAX_LENGTH,
            });
        }

        if name.chars().any(|c| c.is_control()) {
            return Err(ProfileNameError::InvalidCharacter);
        }

        Ok(())
    }
}

impl fmt::Debug for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProfileName").field(&self.0).finish()
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProfileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProfileName {
    type Error = ProfileNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ProfileName {
    type Error = ProfileNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProfileName> for String {
    fn from(name: ProfileName) -> Self {
        name.0
    }
}

// ============================================================================
// Tests
// ============================================================================
