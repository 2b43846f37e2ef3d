//! # Validation Token Value Type
//!
//! The opaque value printed (and QR-encoded) on a certificate. Derivation
//! lives in `rtcert-crypto`; this crate only defines the value type so the
//! certificate model can carry it without depending on the crypto crate.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Length of a validation token in bytes (HMAC-SHA-256 output).
pub const TOKEN_LEN: usize = 32;

/// An opaque validation token: 32 bytes, rendered as 64 lowercase hex
/// characters.
///
/// Constructed either by the token deriver (`rtcert-crypto`) or by parsing
/// a stored/supplied hex string. Equality via `==` is not constant-time;
/// public-facing comparison must go through the crypto crate's
/// constant-time check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidationToken([u8; TOKEN_LEN]);

impl ValidationToken {
    /// Wrap raw MAC output bytes.
    pub fn from_bytes(bytes: [u8; TOKEN_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character hex string (case-insensitive on input).
    ///
    /// # Errors
    ///
    /// Returns a validation error for anything that is not exactly 64 hex
    /// characters. Callers on the public validation path must treat this
    /// the same as a token mismatch, not as a distinct error class.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if s.len() != TOKEN_LEN * 2 {
            return Err(CoreError::Validation(format!(
                "validation token must be {} hex characters, got {}",
                TOKEN_LEN * 2,
                s.len()
            )));
        }
        let mut bytes = [0u8; TOKEN_LEN];
        hex::decode_to_slice(s.to_ascii_lowercase(), &mut bytes)
            .map_err(|e| CoreError::Validation(format!("invalid validation token hex: {e}")))?;
        Ok(Self(bytes))
    }

    /// The raw token bytes.
    pub fn as_bytes(&self) -> &[u8; TOKEN_LEN] {
        &self.0
    }

    /// Render as 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ValidationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ValidationToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ValidationToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let token = ValidationToken::from_bytes([0xAB; 32]);
        let hex = token.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(hex, hex.to_ascii_lowercase());
        assert_eq!(ValidationToken::parse(&hex).unwrap(), token);
    }

    #[test]
    fn parse_accepts_uppercase_input() {
        let token = ValidationToken::from_bytes([0xCD; 32]);
        let upper = token.to_hex().to_ascii_uppercase();
        assert_eq!(ValidationToken::parse(&upper).unwrap(), token);
    }

    #[test]
    fn parse_rejects_wrong_length_and_non_hex() {
        assert!(ValidationToken::parse("").is_err());
        assert!(ValidationToken::parse(&"a".repeat(63)).is_err());
        assert!(ValidationToken::parse(&"a".repeat(65)).is_err());
        assert!(ValidationToken::parse(&"g".repeat(64)).is_err());
    }

    #[test]
    fn serde_is_hex_string() {
        let token = ValidationToken::from_bytes([0x01; 32]);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: ValidationToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
