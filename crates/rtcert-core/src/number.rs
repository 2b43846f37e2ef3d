//! # Certificate Numbers
//!
//! Human-readable, year-scoped sequential certificate numbers in the form
//! `RTC-YYYY-NNNNN`.
//!
//! The generator is a pure function of `(prior_count_for_year, issued_at)`.
//! It does not guarantee uniqueness by itself — that depends on the caller
//! supplying an accurate per-year count. The certificate store's
//! (course, participant) uniqueness guard is the authoritative protection
//! against duplicate rows; the number sequence rides on the same critical
//! section.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::temporal::Timestamp;

/// Prefix for all certificate numbers issued by this system.
pub const CERTIFICATE_NUMBER_PREFIX: &str = "RTC";

/// Zero-padded width of the sequence component. Five digits gives 99,999
/// certificates per calendar year before rollover.
const SEQUENCE_WIDTH: usize = 5;

/// A certificate number, e.g. `RTC-2025-00005`.
///
/// Assigned once at issuance, never reassigned. The only constructors are
/// [`CertificateNumber::next`] (issuance path) and
/// [`CertificateNumber::parse`] (rehydration from storage), so a value of
/// this type is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateNumber(String);

impl CertificateNumber {
    /// Produce the next certificate number for the calendar year of
    /// `issued_at`, given the count of certificates already issued that
    /// year.
    pub fn next(prior_count_for_year: u32, issued_at: Timestamp) -> Self {
        let seq = prior_count_for_year + 1;
        Self(format!(
            "{CERTIFICATE_NUMBER_PREFIX}-{}-{seq:0width$}",
            issued_at.year(),
            width = SEQUENCE_WIDTH
        ))
    }

    /// Parse a stored certificate number, validating the format.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let mut parts = s.splitn(3, '-');
        let (prefix, year, seq) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(y), Some(n)) => (p, y, n),
            _ => return Err(CoreError::MalformedNumber(s.to_string())),
        };
        let well_formed = prefix == CERTIFICATE_NUMBER_PREFIX
            && year.len() == 4
            && year.chars().all(|c| c.is_ascii_digit())
            && seq.len() == SEQUENCE_WIDTH
            && seq.chars().all(|c| c.is_ascii_digit());
        if !well_formed {
            return Err(CoreError::MalformedNumber(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// The sequence component, e.g. `5` for `RTC-2025-00005`.
    ///
    /// Both constructors guarantee the suffix is exactly five ASCII
    /// digits, so the fallback never fires on a real value.
    pub fn sequence(&self) -> u32 {
        self.0
            .rsplit('-')
            .next()
            .and_then(|seq| seq.parse().ok())
            .unwrap_or(0)
    }

    /// The number as a display string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CertificateNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn fifth_certificate_of_2025() {
        let n = CertificateNumber::next(4, ts("2025-01-10T00:00:00Z"));
        assert_eq!(n.as_str(), "RTC-2025-00005");
    }

    #[test]
    fn first_certificate_of_a_year() {
        let n = CertificateNumber::next(0, ts("2026-03-01T09:00:00Z"));
        assert_eq!(n.as_str(), "RTC-2026-00001");
    }

    #[test]
    fn sequence_is_zero_padded() {
        let n = CertificateNumber::next(122, ts("2025-06-15T10:00:00Z"));
        assert_eq!(n.as_str(), "RTC-2025-00123");
    }

    #[test]
    fn year_comes_from_issuance_timestamp() {
        let dec = CertificateNumber::next(40, ts("2025-12-31T23:59:59Z"));
        let jan = CertificateNumber::next(0, ts("2026-01-01T00:00:00Z"));
        assert_eq!(dec.as_str(), "RTC-2025-00041");
        assert_eq!(jan.as_str(), "RTC-2026-00001");
    }

    #[test]
    fn sequence_round_trips_through_next() {
        assert_eq!(CertificateNumber::next(4, ts("2025-01-10T00:00:00Z")).sequence(), 5);
        assert_eq!(
            CertificateNumber::parse("RTC-2025-00123").unwrap().sequence(),
            123
        );
    }

    #[test]
    fn parse_accepts_generated_numbers() {
        let n = CertificateNumber::next(7, ts("2025-01-10T00:00:00Z"));
        assert_eq!(CertificateNumber::parse(n.as_str()).unwrap(), n);
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in [
            "",
            "RTC-2025",
            "RTC-2025-1",
            "RTC-25-00001",
            "XYZ-2025-00001",
            "RTC-2025-0000X",
            "rtc-2025-00001",
        ] {
            assert!(CertificateNumber::parse(bad).is_err(), "accepted: {bad}");
        }
    }

    #[test]
    fn serde_is_transparent() {
        let n = CertificateNumber::next(4, ts("2025-01-10T00:00:00Z"));
        assert_eq!(serde_json::to_string(&n).unwrap(), "\"RTC-2025-00005\"");
    }
}
