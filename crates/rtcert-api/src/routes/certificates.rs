//! # Certificate Issuance and Revocation
//!
//! Issuance is idempotent per (course, participant) pair: re-requesting
//! returns the existing certificate (HTTP 200) instead of creating a
//! duplicate (HTTP 201). The response carries the rendered PDF as base64;
//! a render failure is logged and the PDF omitted, because the persisted
//! certificate does not depend on the artifact.
//!
//! ## Endpoints
//!
//! - `POST /v1/certificates` — Issue (or return existing).
//! - `GET /v1/certificates/:id` — Fetch a certificate record.
//! - `POST /v1/certificates/:id/revoke` — Revoke (terminal).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use rtcert_core::{
    Certificate, CertificateId, CertificateNumber, CourseId, ParticipantId, Timestamp,
    DEFAULT_VALIDITY_YEARS,
};
use rtcert_issuance::issue;
use rtcert_pdf::build_payload;

use crate::db;
use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for certificate issuance.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IssueCertificateRequest {
    pub course_id: Uuid,
    pub participant_id: Uuid,
}

/// Certificate record as returned by the administrative endpoints.
///
/// Carries the internal foreign keys; the public verification endpoint
/// returns a redacted summary instead.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CertificateView {
    pub id: Uuid,
    pub number: String,
    pub course_id: Uuid,
    pub participant_id: Uuid,
    pub issued_at: String,
    pub expires_at: String,
    pub status: String,
}

impl From<&Certificate> for CertificateView {
    fn from(cert: &Certificate) -> Self {
        Self {
            id: *cert.id.as_uuid(),
            number: cert.number.as_str().to_string(),
            course_id: *cert.course_id.as_uuid(),
            participant_id: *cert.participant_id.as_uuid(),
            issued_at: cert.issued_at.to_iso8601(),
            expires_at: cert.expires_at.to_iso8601(),
            status: cert.status.as_str().to_string(),
        }
    }
}

/// Response from the issuance endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueCertificateResponse {
    pub certificate: CertificateView,
    /// `true` if this request created the certificate; `false` if the
    /// existing one for the pair was returned.
    pub created: bool,
    /// The rendered PDF, base64-encoded. Absent if rendering failed; the
    /// certificate itself is unaffected and can be re-rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_base64: Option<String>,
    /// Download filename for the PDF.
    pub filename: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the certificates router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/certificates", post(issue_certificate))
        .route("/v1/certificates/:id", get(get_certificate))
        .route("/v1/certificates/:id/revoke", post(revoke_certificate))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/certificates — Issue a certificate.
///
/// Returns 201 with the new certificate and its PDF, or 200 with the
/// existing certificate when the pair has already been issued (the PDF is
/// re-rendered from stored fields).
#[utoipa::path(
    post,
    path = "/v1/certificates",
    request_body = IssueCertificateRequest,
    responses(
        (status = 201, description = "Certificate issued", body = IssueCertificateResponse),
        (status = 200, description = "Certificate already existed for the pair",
            body = IssueCertificateResponse),
        (status = 404, description = "Course or participant not found",
            body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn issue_certificate(
    State(state): State<AppState>,
    Json(req): Json<IssueCertificateRequest>,
) -> Result<(StatusCode, Json<IssueCertificateResponse>), AppError> {
    let course_id = CourseId(req.course_id);
    let participant_id = ParticipantId(req.participant_id);

    let course = state
        .courses
        .get(&course_id)
        .ok_or_else(|| AppError::NotFound(format!("course {} not found", req.course_id)))?;
    let participant = state.participants.get(&participant_id).ok_or_else(|| {
        AppError::NotFound(format!("participant {} not found", req.participant_id))
    })?;

    let outcome = issue(
        &state.certificates,
        &course,
        &participant,
        &state.deriver,
        Timestamp::now(),
        DEFAULT_VALIDITY_YEARS,
    )?;
    let mut certificate = outcome.certificate;
    let mut created = outcome.created;

    if created {
        if let Some(pool) = &state.db_pool {
            (certificate, created) = persist_issued(&state, pool, certificate).await?;
        }
    }

    let payload = build_payload(
        &certificate,
        &course,
        &participant,
        &state.config.public_base_url,
    );
    let pdf_base64 = match state.renderer.render(&payload) {
        Ok(bytes) => Some(BASE64.encode(bytes)),
        Err(e) => {
            tracing::error!(
                certificate = %certificate.number,
                error = %e,
                "PDF rendering failed; certificate remains issued"
            );
            None
        }
    };

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(IssueCertificateResponse {
            certificate: CertificateView::from(&certificate),
            created,
            pdf_base64,
            filename: payload.filename,
        }),
    ))
}

/// Bound on renumber-and-retry attempts after number-sequence conflicts.
const MAX_NUMBER_RETRIES: u32 = 3;

/// Write a freshly issued certificate through to the database, keeping the
/// in-memory store consistent with whatever the database accepts.
///
/// Unique violations are recovered, not surfaced. A pair conflict means
/// another process issued for this pair first: its row replaces the local
/// record in memory and is returned with `created = false`. A number
/// conflict means the local year sequence was behind the table: the
/// certificate is renumbered from the persisted maximum and the insert
/// retried. Any unrecoverable failure rolls the local record back so
/// memory never serves a certificate the database refused.
async fn persist_issued(
    state: &AppState,
    pool: &sqlx::PgPool,
    mut certificate: Certificate,
) -> Result<(Certificate, bool), AppError> {
    for _ in 0..MAX_NUMBER_RETRIES {
        let err = match db::certificates::insert(pool, &certificate).await {
            Ok(()) => return Ok((certificate, true)),
            Err(err) => err,
        };

        match db::unique_violation_constraint(&err) {
            Some(db::CERT_PAIR_CONSTRAINT) => {
                tracing::warn!(
                    course = %certificate.course_id,
                    participant = %certificate.participant_id,
                    "concurrent issuance detected; adopting the persisted certificate"
                );
                let fetched = db::certificates::get_by_pair(
                    pool,
                    certificate.course_id,
                    certificate.participant_id,
                )
                .await;
                match fetched {
                    Ok(Some(existing)) => {
                        state.certificates.replace_for_pair(existing.clone());
                        return Ok((existing, false));
                    }
                    Ok(None) => {
                        state.certificates.remove(&certificate.id);
                        return Err(AppError::Internal(
                            "pair constraint violated but no row for the pair".to_string(),
                        ));
                    }
                    Err(e) => {
                        state.certificates.remove(&certificate.id);
                        return Err(e.into());
                    }
                }
            }
            Some(db::CERT_NUMBER_CONSTRAINT) => {
                let year = certificate.issued_at.year();
                let floor = match db::certificates::year_sequence_floor(pool, year).await {
                    Ok(floor) => floor,
                    Err(e) => {
                        state.certificates.remove(&certificate.id);
                        return Err(e.into());
                    }
                };
                let renumbered = CertificateNumber::next(floor, certificate.issued_at);
                tracing::warn!(
                    conflicting = %certificate.number,
                    renumbered = %renumbered,
                    "certificate number already persisted by another process; renumbering"
                );
                certificate.number = renumbered;
                state.certificates.replace_for_pair(certificate.clone());
            }
            _ => {
                state.certificates.remove(&certificate.id);
                return Err(db::DbError::Sqlx(err).into());
            }
        }
    }

    state.certificates.remove(&certificate.id);
    Err(AppError::Internal(
        "certificate renumbering did not converge".to_string(),
    ))
}

/// GET /v1/certificates/:id — Fetch a certificate record.
#[utoipa::path(
    get,
    path = "/v1/certificates/{id}",
    params(("id" = Uuid, Path, description = "Certificate ID")),
    responses(
        (status = 200, description = "Certificate record", body = CertificateView),
        (status = 404, description = "Certificate not found", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn get_certificate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CertificateView>, AppError> {
    let certificate = state
        .certificates
        .get(&CertificateId(id))
        .ok_or_else(|| AppError::NotFound(format!("certificate {id} not found")))?;
    Ok(Json(CertificateView::from(&certificate)))
}

/// POST /v1/certificates/:id/revoke — Revoke a certificate.
///
/// Revocation is terminal; revoking an already revoked certificate is a
/// 409. The public verification endpoint reports revoked certificates
/// regardless of token correctness.
#[utoipa::path(
    post,
    path = "/v1/certificates/{id}/revoke",
    params(("id" = Uuid, Path, description = "Certificate ID")),
    responses(
        (status = 200, description = "Certificate revoked", body = CertificateView),
        (status = 404, description = "Certificate not found", body = crate::error::ErrorBody),
        (status = 409, description = "Already revoked", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub async fn revoke_certificate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CertificateView>, AppError> {
    let certificate_id = CertificateId(id);
    let revoked = state
        .certificates
        .revoke(&certificate_id)
        .ok_or_else(|| AppError::NotFound(format!("certificate {id} not found")))??;

    if let Some(pool) = &state.db_pool {
        db::certificates::update_status(pool, certificate_id, revoked.status).await?;
    }

    tracing::info!(certificate = %revoked.number, "certificate revoked");
    Ok(Json(CertificateView::from(&revoked)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::state::AppConfig;
    use rtcert_crypto::{SigningSecret, TokenDeriver};

    fn test_state() -> AppState {
        let secret = SigningSecret::new("fixture-secret-for-tests-only").unwrap();
        let deriver = TokenDeriver::new(&secret).unwrap();
        AppState::with_config(AppConfig::default(), deriver, None)
    }

    fn test_app(state: AppState) -> Router<()> {
        Router::new()
            .merge(router())
            .merge(crate::routes::courses::router())
            .merge(crate::routes::participants::router())
            .with_state(state)
    }

    /// Helper: read the response body as bytes and deserialize from JSON.
    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn post_json(app: &Router<()>, uri: &str, body: &str) -> axum::response::Response {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(req).await.unwrap()
    }

    /// Create a course and return its ID.
    async fn create_test_course(app: &Router<()>) -> Uuid {
        let resp = post_json(
            app,
            "/v1/courses",
            r#"{"title":"KUKA Grundlagen KR C5","manufacturer":"kuka","course_type":"fundamentals",
                "start_date":"2025-01-06T08:00:00Z","end_date":"2025-01-10T16:00:00Z",
                "duration_days":5,"location":"Dortmund","trainer":"A. Schneider"}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let view: crate::routes::courses::CourseView = body_json(resp).await;
        view.id
    }

    /// Create a participant and return their ID.
    async fn create_test_participant(app: &Router<()>) -> Uuid {
        let resp = post_json(
            app,
            "/v1/participants",
            r#"{"first_name":"Erika","last_name":"Mustermann","company":"Musterfirma GmbH"}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let view: crate::routes::participants::ParticipantView = body_json(resp).await;
        view.id
    }

    async fn issue_for(
        app: &Router<()>,
        course_id: Uuid,
        participant_id: Uuid,
    ) -> axum::response::Response {
        post_json(
            app,
            "/v1/certificates",
            &format!(r#"{{"course_id":"{course_id}","participant_id":"{participant_id}"}}"#),
        )
        .await
    }

    // ── Integration tests ────────────────────────────────────────

    #[tokio::test]
    async fn issuance_creates_then_returns_existing() {
        let app = test_app(test_state());
        let course_id = create_test_course(&app).await;
        let participant_id = create_test_participant(&app).await;

        let first = issue_for(&app, course_id, participant_id).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let first: IssueCertificateResponse = body_json(first).await;
        assert!(first.created);
        assert!(first.certificate.number.starts_with("RTC-"));
        assert_eq!(first.certificate.status, "ACTIVE");

        let second = issue_for(&app, course_id, participant_id).await;
        assert_eq!(second.status(), StatusCode::OK);
        let second: IssueCertificateResponse = body_json(second).await;
        assert!(!second.created);
        assert_eq!(second.certificate.id, first.certificate.id);
        assert_eq!(second.certificate.number, first.certificate.number);
        assert_eq!(second.certificate.issued_at, first.certificate.issued_at);
    }

    #[tokio::test]
    async fn issuance_returns_pdf_and_filename() {
        let app = test_app(test_state());
        let course_id = create_test_course(&app).await;
        let participant_id = create_test_participant(&app).await;

        let resp = issue_for(&app, course_id, participant_id).await;
        let body: IssueCertificateResponse = body_json(resp).await;

        let pdf = BASE64.decode(body.pdf_base64.expect("pdf should render")).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        assert!(body.filename.starts_with("Certificate_Mustermann_Erika_RTC-"));
        assert!(body.filename.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn unknown_course_returns_404() {
        let app = test_app(test_state());
        let participant_id = create_test_participant(&app).await;

        let resp = issue_for(&app, Uuid::new_v4(), participant_id).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_participant_returns_404() {
        let app = test_app(test_state());
        let course_id = create_test_course(&app).await;

        let resp = issue_for(&app, course_id, Uuid::new_v4()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_certificate_by_id() {
        let app = test_app(test_state());
        let course_id = create_test_course(&app).await;
        let participant_id = create_test_participant(&app).await;

        let issued: IssueCertificateResponse =
            body_json(issue_for(&app, course_id, participant_id).await).await;

        let req = Request::builder()
            .uri(format!("/v1/certificates/{}", issued.certificate.id))
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let view: CertificateView = body_json(resp).await;
        assert_eq!(view.number, issued.certificate.number);

        let req = Request::builder()
            .uri(format!("/v1/certificates/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn revocation_is_terminal() {
        let app = test_app(test_state());
        let course_id = create_test_course(&app).await;
        let participant_id = create_test_participant(&app).await;

        let issued: IssueCertificateResponse =
            body_json(issue_for(&app, course_id, participant_id).await).await;
        let revoke_uri = format!("/v1/certificates/{}/revoke", issued.certificate.id);

        let resp = post_json(&app, &revoke_uri, "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let view: CertificateView = body_json(resp).await;
        assert_eq!(view.status, "REVOKED");

        // Second revocation conflicts.
        let resp = post_json(&app, &revoke_uri, "").await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // Unknown id.
        let resp = post_json(
            &app,
            &format!("/v1/certificates/{}/revoke", Uuid::new_v4()),
            "",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn router_builds_successfully() {
        let _router = router();
    }
}
