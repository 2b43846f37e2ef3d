//! # Render Payload
//!
//! The data contract between issuance and the PDF renderer: every display
//! field printed on a certificate, pre-formatted, plus the validation URL
//! encoded into the scannable code. Building the payload is pure; it
//! performs no I/O and can be repeated from stored fields at any time.

use serde::{Deserialize, Serialize};

use rtcert_core::{Certificate, CertificateId, Course, Participant, Timestamp, ValidationToken};

/// All fields the renderer draws, plus the validation URL.
///
/// Deliberately excluded: the signing secret (never leaves the crypto
/// crate) and raw course/participant identifiers (the URL carries the
/// certificate id, which is the only identifier a verifier needs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPayload {
    pub certificate_number: String,
    pub participant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub course_title: String,
    pub course_type: String,
    pub manufacturer: String,
    /// Course dates formatted `DD.MM.YYYY` for print.
    pub start_date: String,
    pub end_date: String,
    pub duration_days: u32,
    pub issued_at: String,
    pub expires_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trainer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Public URL encoded into the scannable code, token included as a
    /// query parameter.
    pub validation_url: String,
    /// Download filename for the rendered artifact.
    pub filename: String,
}

/// Build the public validation URL for a certificate.
///
/// Shape: `{base}/verify/{certificate_id}?token={hex}` — the id is in the
/// path, the token rides as a query parameter so the URL can be pasted
/// into a browser from the printed code.
pub fn validation_url(base_url: &str, id: &CertificateId, token: &ValidationToken) -> String {
    format!(
        "{}/verify/{}?token={}",
        base_url.trim_end_matches('/'),
        id.as_uuid(),
        token.to_hex()
    )
}

/// Assemble the render payload from stored records.
pub fn build_payload(
    certificate: &Certificate,
    course: &Course,
    participant: &Participant,
    base_url: &str,
) -> RenderPayload {
    RenderPayload {
        certificate_number: certificate.number.to_string(),
        participant_name: participant.full_name(),
        company: participant.company.clone(),
        course_title: course.title.clone(),
        course_type: course.course_type.label().to_string(),
        manufacturer: course.manufacturer.label().to_string(),
        start_date: format_certificate_date(course.start_date),
        end_date: format_certificate_date(course.end_date),
        duration_days: course.duration_days,
        issued_at: format_certificate_date(certificate.issued_at),
        expires_at: format_certificate_date(certificate.expires_at),
        trainer: course.trainer.clone(),
        location: course.location.clone(),
        validation_url: validation_url(base_url, &certificate.id, &certificate.validation_token),
        filename: filename(participant, certificate),
    }
}

/// Print-format a timestamp as `DD.MM.YYYY`.
fn format_certificate_date(ts: Timestamp) -> String {
    ts.as_datetime().format("%d.%m.%Y").to_string()
}

/// Download filename: `Certificate_<LastName>_<FirstName>_<Number>.pdf`,
/// with path-hostile characters stripped from the name parts.
fn filename(participant: &Participant, certificate: &Certificate) -> String {
    format!(
        "Certificate_{}_{}_{}.pdf",
        sanitize(&participant.last_name),
        sanitize(&participant.first_name),
        certificate.number
    )
}

fn sanitize(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}
