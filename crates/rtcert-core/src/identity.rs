//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all identifiers in the certificate stack. These
//! prevent accidental identifier confusion — you cannot pass a `CourseId`
//! where a `ParticipantId` is expected.
//!
//! The distinction matters beyond ergonomics: the validation token is a
//! keyed MAC over `(course_id, participant_id, issued_at)`, and swapping
//! the first two fields would still produce a well-formed but wrong token.
//! The type system rules that call-site mistake out.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Unique identifier for a course offering (a scheduled training).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(pub Uuid);

/// Unique identifier for a participant (a person who may be certified).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub Uuid);

/// Unique identifier for an issued certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId(pub Uuid);

macro_rules! impl_uuid_id {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse from a string UUID representation.
            pub fn parse(s: &str) -> Result<Self, CoreError> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| CoreError::Validation(format!("invalid {}: {e}", $prefix)))
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}:{}", $prefix, self.0)
            }
        }
    };
}

impl_uuid_id!(CourseId, "course");
impl_uuid_id!(ParticipantId, "participant");
impl_uuid_id!(CertificateId, "certificate");
