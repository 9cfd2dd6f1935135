//! Rate Limiting Infrastructure
//!
//! Fixed-window rate limit configuration. Window state is persisted by the
//! domain crates (store-backed counters survive horizontal scaling).

use std::time::Duration;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum attempts allowed in the window
    pub max_attempts: u32,
    /// Time window duration
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn new(max_attempts: u32, window_secs: u64) -> Self {
        Self {
            max_attempts,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    pub fn window_secs(&self) -> u64 {
        self.window.as_secs()
    }

    /// Seconds until a window that started at `window_start_ms` expires
    ///
    /// Returns 0 when the window has already elapsed.
    pub fn retry_after_secs(&self, window_start_ms: i64, now_ms: i64) -> u64 {
        let elapsed_ms = now_ms.saturating_sub(window_start_ms);
        let remaining_ms = self.window_ms().saturating_sub(elapsed_ms);
        (remaining_ms.max(0) as u64).div_ceil(1000)
    }
}
