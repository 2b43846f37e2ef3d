//! # rtcert-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the certificate API. Refuses to start
//! without `CERTIFICATE_SECRET`: a fallback key would make every issued
//! validation token forgeable.

use rtcert_api::state::{AppConfig, AppState};
use rtcert_crypto::{SigningSecret, TokenDeriver};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // The signing secret is required; startup aborts without it.
    let secret = match std::env::var("CERTIFICATE_SECRET") {
        Ok(s) => s,
        Err(_) => {
            tracing::error!("CERTIFICATE_SECRET is not set; refusing to start");
            return Err("CERTIFICATE_SECRET must be set".into());
        }
    };
    let secret = SigningSecret::new(secret).map_err(|e| {
        tracing::error!("CERTIFICATE_SECRET is unusable: {e}");
        e
    })?;
    let deriver = TokenDeriver::new(&secret).map_err(|e| {
        tracing::error!("token deriver initialization failed: {e}");
        e
    })?;

    // Build configuration from environment.
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let public_base_url = std::env::var("PUBLIC_BASE_URL")
        .unwrap_or_else(|_| format!("http://localhost:{port}"));
    let config = AppConfig {
        port,
        public_base_url,
    };

    // Initialize database pool (optional — absent means in-memory only).
    let db_pool = rtcert_api::db::init_pool().await.map_err(|e| {
        tracing::error!("database initialization failed: {e}");
        e
    })?;

    let state = AppState::with_config(config, deriver, db_pool);

    // Hydrate in-memory stores from database (if connected).
    state.hydrate_from_db().await.map_err(|e| {
        tracing::error!("database hydration failed: {e}");
        e
    })?;

    let app = rtcert_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("certificate API listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
