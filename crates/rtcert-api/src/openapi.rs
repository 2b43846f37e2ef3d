//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single spec, served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Training Certificate API",
        version = "0.1.0",
        description = "Certificate issuance, public verification, and revocation for robotics training courses.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Certificates
        crate::routes::certificates::issue_certificate,
        crate::routes::certificates::get_certificate,
        crate::routes::certificates::revoke_certificate,
        // Verification
        crate::routes::verify::verify_certificate,
        // Courses
        crate::routes::courses::create_course,
        crate::routes::courses::get_course,
        // Participants
        crate::routes::participants::create_participant,
        crate::routes::participants::get_participant,
    ),
    components(schemas(
        // Certificate DTOs
        crate::routes::certificates::IssueCertificateRequest,
        crate::routes::certificates::IssueCertificateResponse,
        crate::routes::certificates::CertificateView,
        // Verification DTOs
        crate::routes::verify::VerifyResponse,
        // Course DTOs
        crate::routes::courses::CreateCourseRequest,
        crate::routes::courses::CourseView,
        // Participant DTOs
        crate::routes::participants::CreateParticipantRequest,
        crate::routes::participants::ParticipantView,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "certificates", description = "Certificate issuance and lifecycle"),
        (name = "verify", description = "Public certificate verification"),
        (name = "courses", description = "Course records"),
        (name = "participants", description = "Participant records"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
