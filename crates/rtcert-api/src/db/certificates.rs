//! Certificate persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `certificates` table.
//! The table's UNIQUE (course_id, participant_id) constraint is the
//! authoritative cross-process guard for the one-certificate-per-pair
//! invariant; callers convert a pair violation into "fetch the existing
//! row" and a number violation into "renumber from [`year_sequence_floor`]
//! and retry" rather than surfacing either.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use rtcert_core::{
    Certificate, CertificateId, CertificateNumber, CertificateStatus, CoreError, CourseId,
    ParticipantId, Timestamp, ValidationToken, CERTIFICATE_NUMBER_PREFIX,
};

use super::DbError;

/// Insert a new certificate record.
///
/// Returns the raw `sqlx::Error` so the caller can classify a unique
/// violation by constraint: pair conflicts recover via [`get_by_pair`],
/// number conflicts via [`year_sequence_floor`].
pub async fn insert(pool: &PgPool, certificate: &Certificate) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO certificates (id, number, course_id, participant_id,
         issued_at, expires_at, validation_token, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(certificate.id.as_uuid())
    .bind(certificate.number.as_str())
    .bind(certificate.course_id.as_uuid())
    .bind(certificate.participant_id.as_uuid())
    .bind(certificate.issued_at.as_datetime())
    .bind(certificate.expires_at.as_datetime())
    .bind(certificate.validation_token.to_hex())
    .bind(certificate.status.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Update certificate status (the only mutable column).
pub async fn update_status(
    pool: &PgPool,
    id: CertificateId,
    status: CertificateStatus,
) -> Result<bool, DbError> {
    let result = sqlx::query("UPDATE certificates SET status = $1 WHERE id = $2")
        .bind(status.as_str())
        .bind(id.as_uuid())
        .execute(pool)
        .await
        .map_err(DbError::Sqlx)?;

    Ok(result.rows_affected() > 0)
}

/// Fetch the certificate for a (course, participant) pair, if any.
pub async fn get_by_pair(
    pool: &PgPool,
    course_id: CourseId,
    participant_id: ParticipantId,
) -> Result<Option<Certificate>, DbError> {
    let row = sqlx::query_as::<_, CertificateRow>(
        "SELECT id, number, course_id, participant_id, issued_at, expires_at,
         validation_token, status
         FROM certificates WHERE course_id = $1 AND participant_id = $2",
    )
    .bind(course_id.as_uuid())
    .bind(participant_id.as_uuid())
    .fetch_optional(pool)
    .await?;

    row.map(CertificateRow::into_record).transpose()
}

/// Highest number sequence already persisted for the given issuance year,
/// or 0 when the year has no rows.
///
/// Used to renumber after a number-constraint conflict: another process
/// assigned the same year sequence first, which means the local per-year
/// count is behind the table. Lexicographic MAX is correct here because
/// numbers within a year share a fixed-width, zero-padded format.
pub async fn year_sequence_floor(pool: &PgPool, year: i32) -> Result<u32, DbError> {
    let max: Option<String> =
        sqlx::query_scalar("SELECT MAX(number) FROM certificates WHERE number LIKE $1")
            .bind(format!("{CERTIFICATE_NUMBER_PREFIX}-{year}-%"))
            .fetch_one(pool)
            .await?;

    match max {
        Some(number) => Ok(CertificateNumber::parse(&number)?.sequence()),
        None => Ok(0),
    }
}

/// Load all certificates from the database into the in-memory store on
/// startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Certificate>, DbError> {
    let rows = sqlx::query_as::<_, CertificateRow>(
        "SELECT id, number, course_id, participant_id, issued_at, expires_at,
         validation_token, status
         FROM certificates ORDER BY issued_at",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(CertificateRow::into_record).collect()
}

fn parse_status(s: &str) -> Result<CertificateStatus, CoreError> {
    match s {
        "ACTIVE" => Ok(CertificateStatus::Active),
        "REVOKED" => Ok(CertificateStatus::Revoked),
        other => Err(CoreError::Validation(format!(
            "unknown certificate status: {other:?}"
        ))),
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CertificateRow {
    id: Uuid,
    number: String,
    course_id: Uuid,
    participant_id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    validation_token: String,
    status: String,
}

impl CertificateRow {
    fn into_record(self) -> Result<Certificate, DbError> {
        Ok(Certificate {
            id: CertificateId(self.id),
            number: CertificateNumber::parse(&self.number)?,
            course_id: CourseId(self.course_id),
            participant_id: ParticipantId(self.participant_id),
            issued_at: Timestamp::from_utc(self.issued_at),
            expires_at: Timestamp::from_utc(self.expires_at),
            validation_token: ValidationToken::parse(&self.validation_token)?,
            status: parse_status(&self.status)?,
        })
    }
}
