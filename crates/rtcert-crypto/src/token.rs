//! # Validation Token Derivation
//!
//! Deterministic keyed digest binding `(course_id, participant_id,
//! issued_at)` to the signing secret. Anyone holding the printed token can
//! ask the validation endpoint to recompute and compare; nobody without
//! the secret can forge a token for altered metadata.
//!
//! ## Encoding
//!
//! Each field is fed to the MAC as an 8-byte big-endian length prefix
//! followed by the field's UTF-8 bytes. A separator-based concatenation
//! would be ambiguous the moment a field could contain the separator;
//! length prefixing removes that class of confusion outright, and HMAC
//! (unlike a bare hash over `secret || data`) is not subject to length
//! extension.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use rtcert_core::{CourseId, ParticipantId, Timestamp, ValidationToken, TOKEN_LEN};

use crate::error::CryptoError;
use crate::secret::SigningSecret;

type HmacSha256 = Hmac<Sha256>;

/// Derives and checks validation tokens with an injected signing secret.
///
/// Constructed once at startup and shared (it is cheap to clone). There is
/// no ambient-environment lookup at call sites; a deriver with a fixture
/// secret behaves identically in tests.
#[derive(Clone)]
pub struct TokenDeriver {
    /// Keyed MAC prototype, cloned per derivation. Holding the prototype
    /// instead of the raw secret keeps key material in exactly one place.
    mac: HmacSha256,
}

impl TokenDeriver {
    /// Create a deriver bound to the given secret.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSecret`] if the MAC cannot be keyed —
    /// fatal at startup, like every other secret defect.
    pub fn new(secret: &SigningSecret) -> Result<Self, CryptoError> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| CryptoError::InvalidSecret(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Derive the validation token for a certificate's binding fields.
    ///
    /// Deterministic: equal inputs produce byte-identical tokens. Any
    /// single differing field produces an unrelated token (standard PRF
    /// property of HMAC-SHA-256).
    pub fn derive(
        &self,
        course_id: &CourseId,
        participant_id: &ParticipantId,
        issued_at: Timestamp,
    ) -> ValidationToken {
        let mut mac = self.mac.clone();

        update_field(&mut mac, course_id.as_uuid().to_string().as_bytes());
        update_field(&mut mac, participant_id.as_uuid().to_string().as_bytes());
        update_field(&mut mac, issued_at.to_iso8601().as_bytes());

        let digest = mac.finalize().into_bytes();
        let mut bytes = [0u8; TOKEN_LEN];
        bytes.copy_from_slice(&digest);
        ValidationToken::from_bytes(bytes)
    }

    /// Constant-time comparison of a supplied token string against the
    /// expected token.
    ///
    /// Any input that is not exactly 64 hex characters counts as a
    /// mismatch — the same outcome class as a wrong token, so the endpoint
    /// does not act as a format oracle.
    pub fn matches(&self, expected: &ValidationToken, supplied: &str) -> bool {
        match ValidationToken::parse(supplied) {
            Ok(supplied) => expected
                .as_bytes()
                .ct_eq(supplied.as_bytes())
                .into(),
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for TokenDeriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenDeriver(<keyed>)")
    }
}

/// Feed one field into the MAC with an unambiguous length prefix.
fn update_field(mac: &mut HmacSha256, bytes: &[u8]) {
    mac.update(&(bytes.len() as u64).to_be_bytes());
    mac.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtcert_core::CertificateId;

    fn deriver() -> TokenDeriver {
        let secret = SigningSecret::new("fixture-secret-for-tests-only").unwrap();
        TokenDeriver::new(&secret).unwrap()
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    #[test]
    fn derivation_is_deterministic() {
        let d = deriver();
        let course = CourseId::new();
        let participant = ParticipantId::new();
        let issued = ts("2025-01-10T00:00:00Z");

        let a = d.derive(&course, &participant, issued);
        let b = d.derive(&course, &participant, issued);
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), b.to_hex());
    }

    #[test]
    fn token_renders_as_64_lowercase_hex() {
        let d = deriver();
        let hex = d
            .derive(&CourseId::new(), &ParticipantId::new(), ts("2025-01-10T00:00:00Z"))
            .to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn any_single_field_changes_the_token() {
        let d = deriver();
        let course = CourseId::new();
        let participant = ParticipantId::new();
        let issued = ts("2025-01-10T00:00:00Z");
        let base = d.derive(&course, &participant, issued);

        assert_ne!(base, d.derive(&CourseId::new(), &participant, issued));
        assert_ne!(base, d.derive(&course, &ParticipantId::new(), issued));
        assert_ne!(
            base,
            d.derive(&course, &participant, ts("2025-01-10T00:00:01Z"))
        );
    }

    #[test]
    fn different_secrets_produce_different_tokens() {
        let course = CourseId::new();
        let participant = ParticipantId::new();
        let issued = ts("2025-01-10T00:00:00Z");

        let a = deriver().derive(&course, &participant, issued);
        let other = SigningSecret::new("another-secret-entirely!").unwrap();
        let b = TokenDeriver::new(&other)
            .unwrap()
            .derive(&course, &participant, issued);
        assert_ne!(a, b);
    }

    #[test]
    fn swapped_ids_produce_different_tokens() {
        // Course and participant IDs are both UUIDs; the length-prefixed
        // field order must still distinguish them.
        let d = deriver();
        let a = uuid::Uuid::new_v4();
        let b = uuid::Uuid::new_v4();
        let issued = ts("2025-01-10T00:00:00Z");

        let forward = d.derive(&CourseId(a), &ParticipantId(b), issued);
        let swapped = d.derive(&CourseId(b), &ParticipantId(a), issued);
        assert_ne!(forward, swapped);
    }

    #[test]
    fn matches_accepts_the_derived_token() {
        let d = deriver();
        let token = d.derive(&CourseId::new(), &ParticipantId::new(), ts("2025-01-10T00:00:00Z"));
        assert!(d.matches(&token, &token.to_hex()));
        assert!(d.matches(&token, &token.to_hex().to_ascii_uppercase()));
    }

    #[test]
    fn single_character_flip_is_detected() {
        let d = deriver();
        let token = d.derive(&CourseId::new(), &ParticipantId::new(), ts("2025-01-10T00:00:00Z"));
        let hex = token.to_hex();

        let mut chars: Vec<char> = hex.chars().collect();
        chars[17] = if chars[17] == '0' { '1' } else { '0' };
        let tampered: String = chars.into_iter().collect();

        assert!(!d.matches(&token, &tampered));
    }

    #[test]
    fn malformed_input_is_a_plain_mismatch() {
        let d = deriver();
        let token = d.derive(&CourseId::new(), &ParticipantId::new(), ts("2025-01-10T00:00:00Z"));

        assert!(!d.matches(&token, ""));
        assert!(!d.matches(&token, "abc"));
        assert!(!d.matches(&token, &"z".repeat(64)));
        assert!(!d.matches(&token, &"a".repeat(63)));
    }

    #[test]
    fn wrong_but_well_formed_token_is_rejected() {
        let d = deriver();
        let token = d.derive(&CourseId::new(), &ParticipantId::new(), ts("2025-01-10T00:00:00Z"));
        assert!(!d.matches(&token, &"a1".repeat(32)));
    }

    #[test]
    fn tokens_are_unrelated_to_certificate_ids() {
        // The token binds course/participant/time, not the certificate row id.
        let d = deriver();
        let token = d.derive(&CourseId::new(), &ParticipantId::new(), ts("2025-01-10T00:00:00Z"));
        assert!(!d.matches(&token, &CertificateId::new().as_uuid().simple().to_string()));
    }
}
