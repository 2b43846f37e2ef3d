//! # rtcert-issuance — Issuance and Validation Orchestration
//!
//! The two workflows of the certificate subsystem:
//!
//! - **Issuance** ([`issue`]): given a loaded course and participant,
//!   derive the validation token, assign the next year-scoped certificate
//!   number, compute the expiry window, and persist — exactly once per
//!   (course, participant) pair. Re-requesting issuance for an existing
//!   pair returns the existing certificate unchanged.
//! - **Validation** ([`validate`]): given a stored certificate and a
//!   supplied token, recompute the expected token, compare in constant
//!   time, and report validity / expiry / revocation with a redacted,
//!   publicly safe summary.
//!
//! The [`CertificateStore`] enforces the pair-uniqueness invariant under a
//! single write lock, so concurrent issuance for the same pair can never
//! persist two certificates.

pub mod error;
pub mod issue;
pub mod store;
pub mod validate;

pub use error::IssuanceError;
pub use issue::{issue, IssueOutcome};
pub use store::CertificateStore;
pub use validate::{validate, CertificateSummary, CourseSummary, ParticipantSummary, ValidationOutcome};
