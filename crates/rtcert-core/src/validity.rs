//! # Validity Window Arithmetic
//!
//! Pure functions computing the expiry timestamp of a certificate and
//! checking whether a certificate is still within its validity window.

use chrono::Months;

use crate::error::CoreError;
use crate::temporal::Timestamp;

/// Default validity window for issued certificates, in calendar years.
pub const DEFAULT_VALIDITY_YEARS: u32 = 3;

/// Compute the expiry timestamp: `issued_at` plus `validity_years` calendar
/// years, preserving month, day, and time of day.
///
/// If the resulting calendar date does not exist (a certificate issued on
/// February 29 expiring in a non-leap year), the date rounds **down** to
/// the nearest valid day of that month.
///
/// # Errors
///
/// Returns [`CoreError::DateOutOfRange`] only if the addition overflows the
/// representable date range.
pub fn expiry_of(issued_at: Timestamp, validity_years: u32) -> Result<Timestamp, CoreError> {
    let months = Months::new(validity_years * 12);
    issued_at
        .as_datetime()
        .checked_add_months(months)
        .map(Timestamp::from_utc)
        .ok_or_else(|| {
            CoreError::DateOutOfRange(format!("{issued_at} + {validity_years} years"))
        })
}

/// Whether a certificate with the given expiry is still valid at `now`.
///
/// Uses strict `<`: a certificate whose `expires_at` equals `now` is
/// already expired.
pub fn is_valid(expires_at: Timestamp, now: Timestamp) -> bool {
    now < expires_at
}
