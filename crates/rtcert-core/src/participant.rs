//! # Participant Model
//!
//! A participant ("Teilnehmer"): a person who may be registered for and
//! certified on a course. Read-only from the certificate subsystem's
//! perspective.

use serde::{Deserialize, Serialize};

use crate::identity::ParticipantId;

/// A person who may be certified on a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub first_name: String,
    pub last_name: String,
    pub company: Option<String>,
    pub email: Option<String>,
}

impl Participant {
    /// Full display name as printed on certificates.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
