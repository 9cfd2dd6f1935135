//! Application Configuration
//!
//! Configuration for the Profiles application layer.

use platform::rate_limit::RateLimitConfig;

/// Maximum failed PIN verifications per window
pub const MAX_VERIFY_ATTEMPTS: u32 = 5;

/// PIN verification window in seconds
pub const VERIFY_WINDOW_SECS: u64 = 900;

/// Fallback name for the auto-provisioned main profile when the token
/// carries no usable display name
pub const MAIN_PROFILE_FALLBACK_NAME: &str = "Mon profil";

/// Profiles application configuration
#[derive(Debug, Clone)]
pub struct ProfilesConfig {
    /// HMAC key for bearer token verification (32 bytes)
    pub token_secret: [u8; 32],
    /// PIN verification rate limit (attempts per fixed window)
    pub pin_rate_limit: RateLimitConfig,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            token_secret: [0u8; 32],
            pin_rate_limit: RateLimitConfig::new(MAX_VERIFY_ATTEMPTS, VERIFY_WINDOW_SECS),
        }
    }
}

impl ProfilesConfig {
    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            token_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }
}
