//! # Certificate Validation
//!
//! Recomputes the expected validation token from stored metadata and
//! compares it, in constant time, against the token supplied by the
//! caller (typically scanned from the printed QR code).
//!
//! ## Disclosure policy
//!
//! The public validation endpoint must not become an oracle. All
//! token-level failures — wrong token, malformed token, tampered token —
//! collapse into one `Invalid` outcome. Revocation is the single status
//! disclosed distinctly, because a revoked certificate is meant to be
//! publicly recognizable as revoked; it overrides token correctness and
//! expiry alike. A `Valid` outcome carries only fields safe for public
//! display — never the token, the secret, or raw foreign keys.

use serde::{Deserialize, Serialize};

use rtcert_core::{Certificate, CertificateNumber, Course, Participant, Timestamp};
use rtcert_crypto::TokenDeriver;

/// Outcome of validating a supplied token against a stored certificate.
#[derive(Debug, Clone)]
pub enum ValidationOutcome {
    /// Token mismatch (or malformed token). Intentionally carries no
    /// detail about why.
    Invalid,
    /// The certificate was administratively revoked. Overrides token
    /// correctness and expiry.
    Revoked,
    /// Token verified. `expired` reflects the validity window at the time
    /// of the check.
    Valid {
        expired: bool,
        summary: CertificateSummary,
    },
}

/// Publicly disclosable certificate fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateSummary {
    pub number: CertificateNumber,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub participant: ParticipantSummary,
    pub course: CourseSummary,
}

/// Participant fields printed on the certificate itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Course fields printed on the certificate itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub title: String,
    pub course_type: String,
    pub manufacturer: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub duration_days: u32,
}

/// Validate `supplied` against the stored certificate.
///
/// The caller loads the certificate plus the course/participant records
/// needed both for token recomputation and for the public summary;
/// a missing certificate is the caller's `NotFound`, not this function's
/// concern.
pub fn validate(
    certificate: &Certificate,
    course: &Course,
    participant: &Participant,
    deriver: &TokenDeriver,
    supplied: &str,
    now: Timestamp,
) -> ValidationOutcome {
    // Revocation is already-public information and overrides everything,
    // including a correct token.
    if certificate.is_revoked() {
        return ValidationOutcome::Revoked;
    }

    let expected = deriver.derive(
        &certificate.course_id,
        &certificate.participant_id,
        certificate.issued_at,
    );
    if !deriver.matches(&expected, supplied) {
        return ValidationOutcome::Invalid;
    }

    ValidationOutcome::Valid {
        expired: certificate.is_expired(now),
        summary: CertificateSummary {
            number: certificate.number.clone(),
            issued_at: certificate.issued_at,
            expires_at: certificate.expires_at,
            participant: ParticipantSummary {
                name: participant.full_name(),
                company: participant.company.clone(),
            },
            course: CourseSummary {
                title: course.title.clone(),
                course_type: course.course_type.label().to_string(),
                manufacturer: course.manufacturer.label().to_string(),
                start_date: course.start_date,
                end_date: course.end_date,
                duration_days: course.duration_days,
            },
        },
    }
}
