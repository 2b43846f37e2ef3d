//! # rtcert-core — Foundational Types for the Certificate Stack
//!
//! This crate is the bedrock of the training certificate stack. It defines
//! the type-system primitives every other crate builds on: identifier
//! newtypes, a UTC-only timestamp, the certificate number format, expiry
//! arithmetic, and the certificate/course/participant domain model.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `CourseId`,
//!    `ParticipantId`, `CertificateId`, `CertificateNumber` — no bare
//!    strings or bare UUIDs for identifiers.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision. The validation token is derived from the
//!    rendered timestamp, so any timezone or sub-second ambiguity would
//!    silently break token recomputation.
//!
//! 3. **One canonical `Certificate` struct.** A single strongly-typed record
//!    with one name per concept; serde field names are the schema.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rtcert-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod certificate;
pub mod course;
pub mod error;
pub mod identity;
pub mod number;
pub mod participant;
pub mod temporal;
pub mod token;
pub mod validity;

// Re-export primary types for ergonomic imports.
pub use certificate::{Certificate, CertificateStatus};
pub use course::{Course, CourseType, Manufacturer};
pub use error::{CoreError, StatusError};
pub use identity::{CertificateId, CourseId, ParticipantId};
pub use number::{CertificateNumber, CERTIFICATE_NUMBER_PREFIX};
pub use participant::Participant;
pub use temporal::Timestamp;
pub use token::{ValidationToken, TOKEN_LEN};
pub use validity::{expiry_of, is_valid, DEFAULT_VALIDITY_YEARS};
