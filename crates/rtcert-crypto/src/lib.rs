//! # rtcert-crypto — Token Derivation for the Certificate Stack
//!
//! Derives and checks the tamper-evident validation token printed on every
//! certificate. The token is a keyed MAC (HMAC-SHA-256) binding the course,
//! the participant, and the issuance instant to the issuer's signing secret,
//! so a third party holding only the printed token can have it re-checked
//! by the validation endpoint without ever seeing the secret.
//!
//! ## Security Invariants
//!
//! - **One byte path into the MAC.** All derivation flows through
//!   [`TokenDeriver::derive`], which feeds the MAC a length-prefixed field
//!   encoding. No caller can concatenate fields ambiguously.
//! - **The secret never leaves this crate.** [`SigningSecret`] has a
//!   redacted `Debug`, no `Display`, no serde, and zeroizes on drop.
//! - **Public comparisons are constant-time.** [`TokenDeriver::matches`]
//!   uses `subtle::ConstantTimeEq`, never `==`.

pub mod error;
pub mod secret;
pub mod token;

pub use error::CryptoError;
pub use secret::SigningSecret;
pub use token::TokenDeriver;
