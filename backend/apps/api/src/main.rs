//! API Server Entry Point
//!
//! Boots the profiles service: env, tracing, database pool, migrations,
//! startup cleanup, CORS, router. Startup errors go through `anyhow`;
//! request-level errors use `kernel::error::AppError`.

use axum::Router;
use base64::Engine;
use base64::engine::general_purpose;
use profiles::{PgProfileRepository, ProfilesConfig, profiles_router};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,profiles=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Database pool ready");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations applied");

    // Profiles configuration
    let config = if cfg!(debug_assertions) && env::var("TOKEN_SECRET").is_err() {
        ProfilesConfig::development()
    } else {
        // Outside development the signing secret must come from the environment
        let secret_b64 =
            env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set in production");
        let secret_bytes = Engine::decode(&general_purpose::STANDARD, &secret_b64)?;
        if secret_bytes.len() != 32 {
            anyhow::bail!("TOKEN_SECRET must decode to exactly 32 bytes");
        }
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);
        ProfilesConfig {
            token_secret: secret,
            ..ProfilesConfig::default()
        }
    };

    // Startup cleanup: drop PIN attempt counters with long-elapsed windows.
    // A failure here is logged, not fatal.
    let repo = PgProfileRepository::new(pool.clone());
    match repo.cleanup_expired(config.pin_rate_limit.window_ms()).await {
        Ok(counters) => {
            tracing::info!(
                counters_deleted = counters,
                "PIN attempt window cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "PIN attempt window cleanup failed, continuing anyway"
            );
        }
    }

    // CORS is open to any origin; auth is carried in the bearer header,
    // not in cookies, so no credentialed requests are involved
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .nest("/api/profiles", profiles_router(repo, config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 31117));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
