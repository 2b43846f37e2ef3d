//! # Course Records
//!
//! Minimal course management: issuance needs course records to exist, and
//! the certificate prints their display fields. Course dates are accepted
//! with any RFC 3339 offset and normalized to UTC on ingest; token
//! derivation only ever sees stored values.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use rtcert_core::{Course, CourseId, CourseType, Manufacturer, Timestamp};

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for course creation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub title: String,
    /// One of: `kuka`, `abb`, `mitsubishi`, `universal_robots`, `other`.
    #[schema(value_type = String)]
    pub manufacturer: Manufacturer,
    /// One of: `fundamentals`, `practice`, `online`, `other`.
    #[schema(value_type = String)]
    pub course_type: CourseType,
    /// RFC 3339; non-UTC offsets are converted to UTC.
    pub start_date: String,
    pub end_date: String,
    pub duration_days: u32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub trainer: Option<String>,
}

/// Course record as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseView {
    pub id: Uuid,
    pub title: String,
    pub manufacturer: String,
    pub course_type: String,
    pub start_date: String,
    pub end_date: String,
    pub duration_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<String>,
}

impl From<&Course> for CourseView {
    fn from(course: &Course) -> Self {
        Self {
            id: *course.id.as_uuid(),
            title: course.title.clone(),
            manufacturer: course.manufacturer.label().to_string(),
            course_type: course.course_type.label().to_string(),
            start_date: course.start_date.to_iso8601(),
            end_date: course.end_date.to_iso8601(),
            duration_days: course.duration_days,
            location: course.location.clone(),
            trainer: course.trainer.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the courses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/courses", post(create_course))
        .route("/v1/courses/:id", get(get_course))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/courses — Create a course record.
#[utoipa::path(
    post,
    path = "/v1/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseView),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseView>), AppError> {
    let title = req.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    if req.duration_days == 0 {
        return Err(AppError::Validation(
            "duration_days must be at least 1".to_string(),
        ));
    }

    let start_date = Timestamp::parse_lenient(&req.start_date)?;
    let end_date = Timestamp::parse_lenient(&req.end_date)?;
    if end_date < start_date {
        return Err(AppError::Validation(
            "end_date must not precede start_date".to_string(),
        ));
    }

    let course = Course {
        id: CourseId::new(),
        title,
        manufacturer: req.manufacturer,
        course_type: req.course_type,
        start_date,
        end_date,
        duration_days: req.duration_days,
        location: req.location,
        trainer: req.trainer,
    };

    if let Some(pool) = &state.db_pool {
        crate::db::courses::insert(pool, &course).await?;
    }
    state.courses.insert(course.id, course.clone());

    tracing::info!(course = %course.id, title = %course.title, "course created");
    Ok((StatusCode::CREATED, Json(CourseView::from(&course))))
}

/// GET /v1/courses/:id — Fetch a course record.
#[utoipa::path(
    get,
    path = "/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course record", body = CourseView),
        (status = 404, description = "Course not found", body = crate::error::ErrorBody),
    ),
    tag = "courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseView>, AppError> {
    let course = state
        .courses
        .get(&CourseId(id))
        .ok_or_else(|| AppError::NotFound(format!("course {id} not found")))?;
    Ok(Json(CourseView::from(&course)))
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

    fn test_app() -> Router<()> {
        let secret = SigningSecret::new("fixture-secret-for-tests-only").unwrap();
        let deriver = TokenDeriver::new(&secret).unwrap();
        let state = AppState::with_config(AppConfig::default(), deriver, None);
        Router::new().merge(router()).with_state(state)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router<()>, body: &str) -> axum::response::Response {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/courses")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(req).await.unwrap()
    }

    const VALID: &str = r#"{"title":"KUKA Grundlagen KR C5","manufacturer":"kuka",
        "course_type":"fundamentals","start_date":"2025-01-06T08:00:00Z",
        "end_date":"2025-01-10T16:00:00Z","duration_days":5}"#;

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let app = test_app();
        let resp = create(&app, VALID).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: CourseView = body_json(resp).await;
        assert_eq!(created.manufacturer, "KUKA");
        assert_eq!(created.course_type, "Grundlagen");

        let req = Request::builder()
            .uri(format!("/v1/courses/{}", created.id))
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: CourseView = body_json(resp).await;
        assert_eq!(fetched.title, created.title);
    }

    #[tokio::test]
    async fn offset_dates_are_normalized_to_utc() {
        let app = test_app();
        let resp = create(
            &app,
            r#"{"title":"Online Robotik","manufacturer":"other","course_type":"online",
                "start_date":"2025-03-03T09:00:00+01:00","end_date":"2025-03-03T17:00:00+01:00",
                "duration_days":1}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let view: CourseView = body_json(resp).await;
        assert_eq!(view.start_date, "2025-03-03T08:00:00Z");
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let app = test_app();
        let resp = create(
            &app,
            r#"{"title":"  ","manufacturer":"kuka","course_type":"fundamentals",
                "start_date":"2025-01-06T08:00:00Z","end_date":"2025-01-10T16:00:00Z",
                "duration_days":5}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn reversed_dates_are_rejected() {
        let app = test_app();
        let resp = create(
            &app,
            r#"{"title":"KUKA Grundlagen","manufacturer":"kuka","course_type":"fundamentals",
                "start_date":"2025-01-10T08:00:00Z","end_date":"2025-01-06T16:00:00Z",
                "duration_days":5}"#,
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_manufacturer_is_rejected_by_serde() {
        let app = test_app();
        let resp = create(
            &app,
            r#"{"title":"Fanuc Basics","manufacturer":"fanuc","course_type":"fundamentals",
                "start_date":"2025-01-06T08:00:00Z","end_date":"2025-01-10T16:00:00Z",
                "duration_days":5}"#,
        )
        .await;
        // Axum's Json extractor rejects the unknown enum token.
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_course_returns_404() {
        let app = test_app();
        let req = Request::builder()
            .uri(format!("/v1/courses/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
