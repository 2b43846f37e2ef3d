//! # Signing Secret
//!
//! The process-wide key for validation-token derivation. Loaded once at
//! startup from configuration, injected into [`crate::TokenDeriver`] at
//! construction, read-only thereafter.

use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Minimum accepted secret length in bytes. Shorter keys than the MAC
/// output width weaken HMAC-SHA-256 below its design strength.
const MIN_SECRET_LEN: usize = 16;

/// The signing secret for token derivation.
///
/// - No `Display`, no serde: the secret cannot end up in a response body
///   or a serialized record by accident.
/// - `Debug` prints a redaction marker, so `{:?}` on any containing struct
///   (config, app state) is safe to log.
/// - The inner bytes are zeroized when the value is dropped.
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Construct from the configured secret string.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSecret`] if the secret is empty or
    /// shorter than 16 bytes. An absent or defective secret must abort
    /// startup; a fallback default key would make every issued token
    /// forgeable.
    pub fn new(secret: impl Into<String>) -> Result<Self, CryptoError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(CryptoError::InvalidSecret(
                "secret must not be empty".to_string(),
            ));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(CryptoError::InvalidSecret(format!(
                "secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                secret.len()
            )));
        }
        Ok(Self(Zeroizing::new(secret.into_bytes())))
    }

    /// Key bytes for MAC construction. Crate-internal only.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}
