//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the certificate stack core.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.

use thiserror::Error;

/// Top-level error type for core domain operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A field failed validation at construction.
    #[error("validation error: {0}")]
    Validation(String),

    /// A timestamp could not be parsed or normalized.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// A certificate number string did not match the expected format.
    #[error("malformed certificate number: {0}")]
    MalformedNumber(String),

    /// Date arithmetic produced an unrepresentable result.
    #[error("date arithmetic out of range: {0}")]
    DateOutOfRange(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error in certificate status transitions.
///
/// The status machine has exactly one transition (`active → revoked`) and
/// `revoked` is terminal, so the only possible rejection is an attempt to
/// leave the terminal state.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StatusError {
    /// Attempted to revoke a certificate that is already revoked.
    #[error("certificate is already revoked; revocation is terminal")]
    AlreadyRevoked,
}
