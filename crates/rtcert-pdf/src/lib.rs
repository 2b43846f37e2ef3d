//! # rtcert-pdf — Certificate Artifact Rendering
//!
//! Turns an issued certificate into the byte artifact handed to the
//! caller. The interesting part is the **data contract**: the
//! [`RenderPayload`] carries every field printed on a certificate plus the
//! public validation URL, and nothing else — no signing secret, no raw
//! foreign keys. The renderer behind [`CertificateRenderer`] consumes the
//! payload and returns complete bytes synchronously, with no partial
//! output.
//!
//! Rendering never participates in persistence: a certificate record is
//! valid without a successfully rendered PDF, and any later attempt can
//! re-render from stored fields alone.

pub mod error;
pub mod payload;
pub mod renderer;

pub use error::RenderError;
pub use payload::{build_payload, validation_url, RenderPayload};
pub use renderer::{CertificateRenderer, MinimalPdfRenderer};
