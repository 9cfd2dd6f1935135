//! Profiles Router

use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::application::config::ProfilesConfig;
use crate::domain::repository::{PinRepository, ProfileRepository, VerifyAttemptsRepository};
use crate::infra::postgres::PgProfileRepository;
use crate::presentation::handlers::{self, ProfilesAppState};

/// Create the Profiles router with PostgreSQL repository
pub fn profiles_router(repo: PgProfileRepository, config: ProfilesConfig) -> Router {
    profiles_router_generic(repo, config)
}

/// Create a generic Profiles router for any repository implementation
pub fn profiles_router_generic<R>(repo: R, config: ProfilesConfig) -> Router
where
    R: ProfileRepository + PinRepository + VerifyAttemptsRepository + Clone + Send + Sync + 'static,
{
    let state = ProfilesAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/",
            get(handlers::list_profiles::<R>).post(handlers::create_profile::<R>),
        )
        .route("/pin/status", get(handlers::pin_status::<R>))
        .route("/pin/set", post(handlers::set_pin::<R>))
        .route("/pin/verify", post(handlers::verify_pin::<R>))
        .route(
            "/{id}",
            patch(handlers::update_profile::<R>).delete(handlers::delete_profile::<R>),
        )
        .with_state(state)
}
