//! # Temporal Types — UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only timestamp type truncated to seconds
//! precision, rendered as ISO8601 with a `Z` suffix.
//!
//! ## Why so strict
//!
//! The validation token printed on a certificate is a keyed MAC over the
//! rendered issuance timestamp. Validation recomputes the token from the
//! stored timestamp years later, possibly on a different host in a
//! different timezone. If two representations of the same instant could
//! render differently (offset form, sub-second digits), recomputation
//! would fail on genuine certificates. Non-UTC inputs are therefore
//! **rejected at construction** on the strict path — there is no silent
//! conversion that could introduce ambiguity.

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an ISO8601 string, rejecting non-UTC offsets.
/// - [`Timestamp::parse_lenient()`] — for ingesting external data; converts to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 / ISO8601 string.
    ///
    /// **Rejects non-UTC inputs.** Only the `Z` suffix is accepted — even
    /// `+00:00`, which is semantically equivalent, is rejected, because
    /// token derivation needs exactly one byte representation per instant.
    /// A lowercase `z` is accepted (RFC 3339 treats it as equivalent) and
    /// normalized to uppercase on render.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid RFC 3339 or uses a
    /// non-Z timezone offset.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with(['Z', 'z']) {
            return Err(CoreError::Timestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }

        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::Timestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;

        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Parse an RFC 3339 string with any timezone offset, converting to UTC.
    ///
    /// Lenient ingest path for external data (calendar imports, CSV
    /// uploads). The result satisfies the same invariant as the strict
    /// path: UTC, seconds precision. Token derivation inputs should come
    /// from stored values, which always originate from the strict path.
    pub fn parse_lenient(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::Timestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// The calendar year of this timestamp (UTC).
    ///
    /// Certificate numbers are sequenced per calendar year of issuance.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2025-01-10T00:00:00Z`).
    ///
    /// This is the byte representation fed into token derivation.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 10, 12, 30, 45).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(123_456_789).unwrap());
        assert_eq!(ts.as_datetime().nanosecond(), 0);
        assert_eq!(ts.to_iso8601(), "2025-01-10T12:30:45Z");
    }

    #[test]
    fn parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2025-01-10T00:00:00Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-01-10T00:00:00Z");
    }

    #[test]
    fn parse_lowercase_z_accepted_and_normalized() {
        let ts = Timestamp::parse("2025-01-10T00:00:00z").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-01-10T00:00:00Z");
        assert_eq!(ts, Timestamp::parse("2025-01-10T00:00:00Z").unwrap());
    }

    #[test]
    fn parse_plus_zero_offset_rejected() {
        assert!(Timestamp::parse("2025-01-10T00:00:00+00:00").is_err());
    }

    #[test]
    fn parse_nonzero_offset_rejected() {
        assert!(Timestamp::parse("2025-01-10T05:00:00+05:00").is_err());
        assert!(Timestamp::parse("2025-01-09T19:00:00-05:00").is_err());
    }

    #[test]
    fn parse_subseconds_truncated() {
        let ts = Timestamp::parse("2025-01-10T00:00:00.987654Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-01-10T00:00:00Z");
    }

    #[test]
    fn parse_invalid_format() {
        assert!(Timestamp::parse("not-a-date").is_err());
        assert!(Timestamp::parse("2025-01-10").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn parse_lenient_converts_offset_to_utc() {
        let ts = Timestamp::parse_lenient("2025-01-10T05:00:00+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2025-01-10T00:00:00Z");
    }

    #[test]
    fn year_is_utc_year() {
        // 23:30 on New Year's Eve in a +02:00 zone is still the old year in UTC.
        let ts = Timestamp::parse_lenient("2026-01-01T01:30:00+02:00").unwrap();
        assert_eq!(ts.year(), 2025);
    }

    #[test]
    fn ordering_and_display() {
        let earlier = Timestamp::parse("2025-01-10T00:00:00Z").unwrap();
        let later = Timestamp::parse("2025-01-10T00:00:01Z").unwrap();
        assert!(earlier < later);
        assert_eq!(format!("{earlier}"), earlier.to_iso8601());
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::parse("2025-01-10T00:00:00Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }
}
