//! # API Route Modules
//!
//! - `certificates` — issuance (idempotent per (course, participant) pair),
//!   record lookup, administrative revocation.
//! - `verify` — the public verification endpoint behind the QR code printed
//!   on every certificate. No authentication, deliberately narrow output.
//! - `courses` — course records (read-mostly reference data for issuance).
//! - `participants` — participant records.

pub mod certificates;
pub mod courses;
pub mod participants;
pub mod verify;
