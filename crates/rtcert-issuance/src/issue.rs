//! # Certificate Issuance
//!
//! Orchestrates a single issuance: derive the validation token, compute
//! the validity window, assign the next year-scoped number, and persist —
//! or return the certificate that already exists for the pair.
//!
//! Loading the course and participant (and surfacing `NotFound` for a
//! missing one) is the API boundary's job; this function receives loaded
//! records and cannot fail on missing references.

use rtcert_core::{
    expiry_of, Certificate, CertificateId, CertificateNumber, CertificateStatus, Course,
    Participant, Timestamp,
};
use rtcert_crypto::TokenDeriver;

use crate::error::IssuanceError;
use crate::store::CertificateStore;

/// Result of an issuance request.
#[derive(Debug, Clone)]
pub struct IssueOutcome {
    pub certificate: Certificate,
    /// `true` if this call created the certificate; `false` if an existing
    /// certificate for the pair was returned (idempotent re-request).
    pub created: bool,
}

/// Issue a certificate for `participant`'s completion of `course`, or
/// return the one that already exists for the pair.
///
/// Certificate identity is a function of the (course, participant) pair,
/// not of how many times issuance was requested: a repeated call returns
/// the original record with its original `id`, `number`, and token, and
/// never mutates stored fields. The PDF can always be re-rendered from the
/// returned certificate.
///
/// # Errors
///
/// Only core computation failures (expiry arithmetic out of range). A
/// concurrent duplicate for the same pair is not an error — the store's
/// critical section converts it into "return existing".
pub fn issue(
    store: &CertificateStore,
    course: &Course,
    participant: &Participant,
    deriver: &TokenDeriver,
    now: Timestamp,
    validity_years: u32,
) -> Result<IssueOutcome, IssuanceError> {
    // Everything derivable from (pair, now) is computed before taking the
    // store's write lock; only the sequence number needs the lock.
    let issued_at = now;
    let validation_token = deriver.derive(&course.id, &participant.id, issued_at);
    let expires_at = expiry_of(issued_at, validity_years)?;

    let (certificate, created) =
        store.get_or_insert_for_pair(course.id, participant.id, issued_at.year(), |prior_count| {
            Certificate {
                id: CertificateId::new(),
                number: CertificateNumber::next(prior_count, issued_at),
                course_id: course.id,
                participant_id: participant.id,
                issued_at,
                expires_at,
                validation_token,
                status: CertificateStatus::Active,
            }
        });

    if created {
        tracing::info!(
            certificate = %certificate.number,
            course = %course.id,
            participant = %participant.id,
            "issued certificate"
        );
    } else {
        tracing::debug!(
            certificate = %certificate.number,
            "issuance re-requested for existing pair; returning existing certificate"
        );
    }

    Ok(IssueOutcome {
        certificate,
        created,
    })
}
