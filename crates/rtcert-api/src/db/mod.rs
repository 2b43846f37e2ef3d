//! # Database Persistence
//!
//! Optional Postgres persistence behind `DATABASE_URL`. The in-memory
//! stores remain authoritative at request time; the database provides
//! durability (write-through on mutation, hydration at startup) and a
//! UNIQUE constraint on (course_id, participant_id) as the authoritative
//! backstop for the one-certificate-per-pair invariant across processes.

pub mod certificates;
pub mod courses;
pub mod participants;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use rtcert_core::CoreError;

/// Errors from the persistence layer.
///
/// Row-to-domain conversion can fail on corrupt data (a token column that
/// is not 64 hex chars, a number that does not parse), which is why this
/// is wider than `sqlx::Error`.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(#[from] CoreError),
}

/// Initialize the connection pool from `DATABASE_URL`, or return `None`
/// for in-memory-only mode when the variable is absent.
///
/// Applies the schema idempotently on connect.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            tracing::info!("DATABASE_URL not set; running with in-memory stores only");
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;
    ensure_schema(&pool).await?;
    tracing::info!("database connected");
    Ok(Some(pool))
}

/// Named UNIQUE constraints on the `certificates` table.
///
/// The insert path must tell them apart: a pair conflict means another
/// process already issued for the same (course, participant), so its row
/// is authoritative; a number conflict means two processes computed the
/// same year sequence for different pairs, so the local certificate must
/// be renumbered and retried.
pub const CERT_PAIR_CONSTRAINT: &str = "certificates_pair_key";
pub const CERT_NUMBER_CONSTRAINT: &str = "certificates_number_key";

/// The named constraint behind a Postgres unique violation (SQLSTATE
/// 23505), or `None` for any other error.
pub fn unique_violation_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => db.constraint(),
        _ => None,
    }
}

async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS courses (
             id UUID PRIMARY KEY,
             title TEXT NOT NULL,
             manufacturer TEXT NOT NULL,
             course_type TEXT NOT NULL,
             start_date TIMESTAMPTZ NOT NULL,
             end_date TIMESTAMPTZ NOT NULL,
             duration_days INTEGER NOT NULL,
             location TEXT,
             trainer TEXT
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS participants (
             id UUID PRIMARY KEY,
             first_name TEXT NOT NULL,
             last_name TEXT NOT NULL,
             company TEXT,
             email TEXT
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS certificates (
             id UUID PRIMARY KEY,
             number TEXT NOT NULL,
             course_id UUID NOT NULL REFERENCES courses(id),
             participant_id UUID NOT NULL REFERENCES participants(id),
             issued_at TIMESTAMPTZ NOT NULL,
             expires_at TIMESTAMPTZ NOT NULL,
             validation_token TEXT NOT NULL,
             status TEXT NOT NULL,
             CONSTRAINT certificates_number_key UNIQUE (number),
             CONSTRAINT certificates_pair_key UNIQUE (course_id, participant_id)
         )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
