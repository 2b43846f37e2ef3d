//! # Certificate Model
//!
//! The canonical, strongly-typed certificate record. Exactly one name per
//! concept; the serde field names below are the schema at every boundary
//! (API, database, render payload).
//!
//! ## Lifecycle
//!
//! Created exactly once per (course, participant) pair. `number`,
//! `issued_at`, `expires_at`, and `validation_token` are set at creation
//! and never mutated. The only status transition is `ACTIVE → REVOKED`;
//! revocation is terminal. Certificates are never physically deleted by
//! this subsystem.

use serde::{Deserialize, Serialize};

use crate::error::StatusError;
use crate::identity::{CertificateId, CourseId, ParticipantId};
use crate::number::CertificateNumber;
use crate::temporal::Timestamp;
use crate::token::ValidationToken;
use crate::validity::is_valid;

/// Lifecycle status of a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    /// Issued and not revoked. May still be past its expiry date —
    /// expiry is computed against the clock, not stored as a status.
    Active,
    /// Administratively invalidated ahead of natural expiry. Terminal.
    Revoked,
}

impl CertificateStatus {
    /// String form used in the database and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Revoked => "REVOKED",
        }
    }
}

/// An issued certificate, bound to exactly one (course, participant) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub id: CertificateId,
    pub number: CertificateNumber,
    pub course_id: CourseId,
    pub participant_id: ParticipantId,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
    pub validation_token: ValidationToken,
    pub status: CertificateStatus,
}

impl Certificate {
    /// Whether this certificate is past its validity window at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        !is_valid(self.expires_at, now)
    }

    /// Whether this certificate has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.status == CertificateStatus::Revoked
    }

    /// Transition to `REVOKED`.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::AlreadyRevoked`] if the certificate is
    /// already in the terminal state — there is no un-revoke.
    pub fn revoke(&mut self) -> Result<(), StatusError> {
        match self.status {
            CertificateStatus::Active => {
                self.status = CertificateStatus::Revoked;
                Ok(())
            }
            CertificateStatus::Revoked => Err(StatusError::AlreadyRevoked),
        }
    }
}
