//! # Cryptographic Error Types
//!
//! Structured errors for the token derivation subsystem. Uses `thiserror`
//! for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Errors from cryptographic operations in the certificate stack.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The signing secret is unusable (empty or otherwise malformed).
    ///
    /// This is a fatal misconfiguration: the process must refuse to start
    /// rather than derive tokens with a defective key.
    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),
}
