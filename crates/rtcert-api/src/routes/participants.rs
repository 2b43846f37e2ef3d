//! # Participant Records
//!
//! Minimal participant management. The email is contact data for the
//! training organization; it is never printed on certificates and never
//! appears in verification responses.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use rtcert_core::{Participant, ParticipantId};

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for participant creation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateParticipantRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Participant record as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&Participant> for ParticipantView {
    fn from(p: &Participant) -> Self {
        Self {
            id: *p.id.as_uuid(),
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            company: p.company.clone(),
            email: p.email.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the participants router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/participants", post(create_participant))
        .route("/v1/participants/:id", get(get_participant))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/participants — Create a participant record.
#[utoipa::path(
    post,
    path = "/v1/participants",
    request_body = CreateParticipantRequest,
    responses(
        (status = 201, description = "Participant created", body = ParticipantView),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "participants"
)]
pub async fn create_participant(
    State(state): State<AppState>,
    Json(req): Json<CreateParticipantRequest>,
) -> Result<(StatusCode, Json<ParticipantView>), AppError> {
    let first_name = req.first_name.trim().to_string();
    let last_name = req.last_name.trim().to_string();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::Validation(
            "first_name and last_name must not be empty".to_string(),
        ));
    }
    if let Some(email) = &req.email {
        if !email.contains('@') {
            return Err(AppError::Validation(format!(
                "email is not an address: {email:?}"
            )));
        }
    }

    let participant = Participant {
        id: ParticipantId::new(),
        first_name,
        last_name,
        company: req.company,
        email: req.email,
    };

    if let Some(pool) = &state.db_pool {
        crate::db::participants::insert(pool, &participant).await?;
    }
    state
        .participants
        .insert(participant.id, participant.clone());

    tracing::info!(participant = %participant.id, "participant created");
    Ok((StatusCode::CREATED, Json(ParticipantView::from(&participant))))
}

/// GET /v1/participants/:id — Fetch a participant record.
#[utoipa::path(
    get,
    path = "/v1/participants/{id}",
    params(("id" = Uuid, Path, description = "Participant ID")),
    responses(
        (status = 200, description = "Participant record", body = ParticipantView),
        (status = 404, description = "Participant not found", body = crate::error::ErrorBody),
    ),
    tag = "participants"
)]
pub async fn get_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ParticipantView>, AppError> {
    let participant = state
        .participants
        .get(&ParticipantId(id))
        .ok_or_else(|| AppError::NotFound(format!("participant {id} not found")))?;
    Ok(Json(ParticipantView::from(&participant)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
