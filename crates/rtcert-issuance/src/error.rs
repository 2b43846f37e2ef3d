//! # Issuance Error Types

use thiserror::Error;

use rtcert_core::CoreError;

/// Errors from issuance orchestration.
///
/// Note what is *not* here: a duplicate (course, participant) pair is not
/// an error. The issuance workflow recovers it by returning the existing
/// certificate, so it never crosses this boundary. Hydration is the one
/// path where a duplicate pair is a real defect (corrupt storage).
#[derive(Error, Debug)]
pub enum IssuanceError {
    /// A core computation failed (date arithmetic out of range, etc.).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Hydration tried to load two certificates for the same
    /// (course, participant) pair.
    #[error("storage holds multiple certificates for course {course_id} / participant {participant_id}")]
    CorruptPair {
        course_id: rtcert_core::CourseId,
        participant_id: rtcert_core::ParticipantId,
    },
}
