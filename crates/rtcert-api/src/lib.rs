//! # rtcert-api — Axum API for the Training Certificate Stack
//!
//! HTTP surface over the issuance and validation services: certificate
//! issuance with PDF generation, the public verification endpoint that
//! backs the QR code printed on every certificate, administrative
//! revocation, and the minimal course/participant management needed to
//! exercise issuance end to end.
//!
//! ## API Surface
//!
//! | Prefix                          | Module                     | Domain            |
//! |---------------------------------|----------------------------|-------------------|
//! | `/v1/certificates/*`            | [`routes::certificates`]   | Issuance, revocation |
//! | `/v1/verify/:id`                | [`routes::verify`]         | Public verification |
//! | `/v1/courses/*`                 | [`routes::courses`]        | Course records    |
//! | `/v1/participants/*`            | [`routes::participants`]   | Participant records |
//!
//! ## OpenAPI
//!
//! Auto-generated spec via utoipa derive macros at `/openapi.json`.

pub mod db;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router.
///
/// Health probes (`/health/*`) are mounted outside the traced API router
/// so probe traffic stays out of the request logs.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::certificates::router())
        .merge(routes::verify::router())
        .merge(routes::courses::router())
        .merge(routes::participants::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
