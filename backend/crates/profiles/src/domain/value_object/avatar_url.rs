//! Avatar URL Value Object
//!
//! Avatars are referenced by URL (media library uploads or identity
//! provider pictures); only the scheme and size are constrained here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an avatar URL (in characters)
pub const AVATAR_URL_MAX_LENGTH: usize = 2048;

/// Error returned when avatar URL validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarUrlError {
    /// URL does not use http or https
    InvalidScheme,

    /// URL is too long
    TooLong { length: usize, max: usize },
}

impl fmt::Display for AvatarUrlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScheme => {
                write!(f, "Avatar URL must start with http:// or https://")
            }
            Self::TooLong { length, max } => {
                write!(f, "Avatar URL is too long ({length} chars, maximum {max})")
            }
        }
    }
}

impl std::error::Error for AvatarUrlError {}

/// Validated avatar URL
///
/// # Invariants
/// - Starts with `http://` or `https://`
/// - At most [`AVATAR_URL_MAX_LENGTH`] characters
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Create a new AvatarUrl from raw input
    pub fn new(input: impl AsRef<str>) -> Result<Self, AvatarUrlError> {
        let url = input.as_ref().trim().to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AvatarUrlError::InvalidScheme);
        }

        let length = url.chars().count();
        if length > AVATAR_URL_MAX_LENGTH {
            return Err(AvatarUrlError::TooLong {
                length,
                max: AVATAR_URL_MAX_LENGTH,
            });
        }

        Ok(Self(url))
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(url: String) -> Self {
        Self(url)
    }

    /// Get the URL as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AvatarUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AvatarUrl").field(&self.0).finish()
    }
}

impl fmt::Display for AvatarUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AvatarUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AvatarUrl {
    type Error = AvatarUrlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AvatarUrl> for String {
    fn from(url: AvatarUrl) -> Self {
        url.0
    }
}
