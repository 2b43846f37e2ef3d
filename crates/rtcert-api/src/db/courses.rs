//! Course persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `courses` table.
//! Manufacturer and course type are stored as their canonical snake_case
//! tokens; an unknown token in a row is corrupt data, not a default.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use rtcert_core::{CoreError, Course, CourseId, CourseType, Manufacturer, Timestamp};

use super::DbError;

/// Insert a new course record.
pub async fn insert(pool: &PgPool, course: &Course) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO courses (id, title, manufacturer, course_type, start_date,
         end_date, duration_days, location, trainer)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(course.id.as_uuid())
    .bind(&course.title)
    .bind(manufacturer_token(course.manufacturer))
    .bind(course_type_token(course.course_type))
    .bind(course.start_date.as_datetime())
    .bind(course.end_date.as_datetime())
    .bind(course.duration_days as i32)
    .bind(&course.location)
    .bind(&course.trainer)
    .execute(pool)
    .await
    .map_err(DbError::Sqlx)?;

    Ok(())
}

/// Load all courses from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Course>, DbError> {
    let rows = sqlx::query_as::<_, CourseRow>(
        "SELECT id, title, manufacturer, course_type, start_date, end_date,
         duration_days, location, trainer
         FROM courses ORDER BY start_date",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(CourseRow::into_record).collect()
}

fn manufacturer_token(m: Manufacturer) -> &'static str {
    match m {
        Manufacturer::Kuka => "kuka",
        Manufacturer::Abb => "abb",
        Manufacturer::Mitsubishi => "mitsubishi",
        Manufacturer::UniversalRobots => "universal_robots",
        Manufacturer::Other => "other",
    }
}

fn parse_manufacturer(s: &str) -> Result<Manufacturer, CoreError> {
    match s {
        "kuka" => Ok(Manufacturer::Kuka),
        "abb" => Ok(Manufacturer::Abb),
        "mitsubishi" => Ok(Manufacturer::Mitsubishi),
        "universal_robots" => Ok(Manufacturer::UniversalRobots),
        "other" => Ok(Manufacturer::Other),
        other => Err(CoreError::Validation(format!(
            "unknown manufacturer token: {other:?}"
        ))),
    }
}

fn course_type_token(t: CourseType) -> &'static str {
    match t {
        CourseType::Fundamentals => "fundamentals",
        CourseType::Practice => "practice",
        CourseType::Online => "online",
        CourseType::Other => "other",
    }
}

fn parse_course_type(s: &str) -> Result<CourseType, CoreError> {
    match s {
        "fundamentals" => Ok(CourseType::Fundamentals),
        "practice" => Ok(CourseType::Practice),
        "online" => Ok(CourseType::Online),
        "other" => Ok(CourseType::Other),
        other => Err(CoreError::Validation(format!(
            "unknown course type token: {other:?}"
        ))),
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    title: String,
    manufacturer: String,
    course_type: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    duration_days: i32,
    location: Option<String>,
    trainer: Option<String>,
}

impl CourseRow {
    fn into_record(self) -> Result<Course, DbError> {
        Ok(Course {
            id: CourseId(self.id),
            title: self.title,
            manufacturer: parse_manufacturer(&self.manufacturer)?,
            course_type: parse_course_type(&self.course_type)?,
            start_date: Timestamp::from_utc(self.start_date),
            end_date: Timestamp::from_utc(self.end_date),
            duration_days: self.duration_days.max(0) as u32,
            location: self.location,
            trainer: self.trainer,
        })
    }
}
