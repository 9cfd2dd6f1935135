//! Profiles (Household Access Control) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Household sub-profiles under one account, main profile auto-provisioned
//! - 4-digit PIN gating mutation of non-main profiles
//! - Store-backed fixed-window rate limiting of PIN verification
//! - Bearer-token account extraction (subject claim as account id)
//!
//! ## Security Model
//! - PIN stored as a salted SHA-256 digest, compared in constant time
//! - 5 failed verifications per 900 s window lock out further attempts
//! - Rate-limit counters persisted, shared across stateless instances
//! - The main profile can never be deleted through the public API

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::ProfilesConfig;
pub use error::{ProfileError, ProfileResult};
pub use infra::postgres::PgProfileRepository;
pub use presentation::router::profiles_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgProfileRepository as ProfileStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
