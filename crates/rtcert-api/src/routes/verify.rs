//! # Public Certificate Verification
//!
//! The endpoint behind the QR code printed on every certificate. It is
//! deliberately narrow: 404 discloses only whether a certificate id
//! exists (the id is printed on the certificate itself); every
//! token-level failure is the same HTTP 200 `{"valid": false}` with no
//! detail; revocation is the single status reported distinctly. A valid
//! response carries the redacted public summary, never the token or
//! internal foreign keys.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use rtcert_core::{CertificateId, Timestamp};
use rtcert_issuance::{validate, ValidationOutcome};

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Query parameters for verification.
///
/// The token is optional at the HTTP layer so a missing parameter is
/// reported as `{"valid": false}` rather than a 400.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// Response from the verification endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    /// Whether the supplied token matches this certificate.
    pub valid: bool,
    /// Present (and `true`) when the certificate was revoked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked: Option<bool>,
    /// Present on valid tokens: whether the validity window has passed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
    /// Public certificate summary, present only on valid tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub certificate: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the verification router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/verify/:id", get(verify_certificate))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/verify/:id?token=... — Verify a certificate token.
///
/// 404 only for an unknown certificate id. All token failures, including
/// malformed tokens, are HTTP 200 with `valid: false`.
#[utoipa::path(
    get,
    path = "/v1/verify/{id}",
    params(
        ("id" = Uuid, Path, description = "Certificate ID from the printed URL"),
        ("token" = Option<String>, Query, description = "Validation token (64 hex chars)"),
    ),
    responses(
        (status = 200, description = "Verification result", body = VerifyResponse),
        (status = 404, description = "Certificate not found", body = crate::error::ErrorBody),
    ),
    tag = "verify"
)]
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyResponse>, AppError> {
    let certificate = state
        .certificates
        .get(&CertificateId(id))
        .ok_or_else(|| AppError::NotFound(format!("certificate {id} not found")))?;

    // A certificate referencing a missing course or participant means the
    // stores are inconsistent, which is our fault, not the verifier's.
    let course = state.courses.get(&certificate.course_id).ok_or_else(|| {
        AppError::Internal(format!(
            "certificate {} references missing course {}",
            certificate.number, certificate.course_id
        ))
    })?;
    let participant = state
        .participants
        .get(&certificate.participant_id)
        .ok_or_else(|| {
            AppError::Internal(format!(
                "certificate {} references missing participant {}",
                certificate.number, certificate.participant_id
            ))
        })?;

    let supplied = query.token.unwrap_or_default();
    let outcome = validate(
        &certificate,
        &course,
        &participant,
        &state.deriver,
        &supplied,
        Timestamp::now(),
    );

    let response = match outcome {
        ValidationOutcome::Invalid => VerifyResponse {
            valid: false,
            revoked: None,
            expired: None,
            certificate: None,
        },
        ValidationOutcome::Revoked => VerifyResponse {
            valid: false,
            revoked: Some(true),
            expired: None,
            certificate: None,
        },
        ValidationOutcome::Valid { expired, summary } => VerifyResponse {
            valid: true,
            revoked: None,
            expired: Some(expired),
            certificate: Some(
                serde_json::to_value(&summary)
                    .map_err(|e| AppError::Internal(format!("summary serialization: {e}")))?,
            ),
        },
    };

    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
