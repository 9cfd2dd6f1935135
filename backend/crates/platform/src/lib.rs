//! Platform - Cross-cutting technical primitives
//!
//! Infrastructure-independent building blocks shared by the domain crates:
//! - `crypto` - hashing, HMAC, randomness, base64 encodings
//! - `pin` - validated 4-digit PIN handling with salted hashing
//! - `token` - bearer token extraction and HS256 verification
//! - `rate_limit` - fixed-window rate limit configuration

pub mod crypto;
pub mod pin;
pub mod rate_limit;
pub mod token;
