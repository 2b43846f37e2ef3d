//! Participant persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `participants` table.

use sqlx::PgPool;
use uuid::Uuid;

use rtcert_core::{Participant, ParticipantId};

use super::DbError;

/// Insert a new participant record.
pub async fn insert(pool: &PgPool, participant: &Participant) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO participants (id, first_name, last_name, company, email)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(participant.id.as_uuid())
    .bind(&participant.first_name)
    .bind(&participant.last_name)
    .bind(&participant.company)
    .bind(&participant.email)
    .execute(pool)
    .await
    .map_err(DbError::Sqlx)?;

    Ok(())
}

/// Load all participants from the database into the in-memory store on
/// startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Participant>, DbError> {
    let rows = sqlx::query_as::<_, ParticipantRow>(
        "SELECT id, first_name, last_name, company, email
         FROM participants ORDER BY last_name, first_name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ParticipantRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ParticipantRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    company: Option<String>,
    email: Option<String>,
}

impl ParticipantRow {
    fn into_record(self) -> Participant {
        Participant {
            id: ParticipantId(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            company: self.company,
            email: self.email,
        }
    }
}
