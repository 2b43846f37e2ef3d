//! # Certificate Renderer
//!
//! The rendering seam. [`CertificateRenderer`] is the synchronous
//! contract; [`MinimalPdfRenderer`] is the shipped implementation, a
//! deliberately small, dependency-free single-page PDF 1.4 emitter that
//! prints the payload fields and the validation URL as text. Layout and
//! artwork are a presentation concern that can replace this implementation
//! behind the trait without touching issuance.

use crate::error::RenderError;
use crate::payload::RenderPayload;

/// Renders a certificate payload into a complete byte artifact.
///
/// Implementations return either all the bytes or an error; no partial
/// output is ever surfaced.
pub trait CertificateRenderer: Send + Sync {
    fn render(&self, payload: &RenderPayload) -> Result<Vec<u8>, RenderError>;
}

/// Longest text line the fixed layout can fit on an A4 page.
const MAX_LINE_CHARS: usize = 160;

/// Minimal deterministic PDF emitter.
///
/// One A4 page, Helvetica, one text block. Identical payloads produce
/// byte-identical PDFs, which keeps re-rendering from stored fields
/// reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalPdfRenderer;

impl MinimalPdfRenderer {
    pub fn new() -> Self {
        Self
    }

    fn lines(payload: &RenderPayload) -> Vec<String> {
        let mut lines = vec![
            "TRAINING CERTIFICATE".to_string(),
            String::new(),
            format!("Certificate no. {}", payload.certificate_number),
            String::new(),
            payload.participant_name.clone(),
        ];
        if let Some(company) = &payload.company {
            lines.push(company.clone());
        }
        lines.push(String::new());
        lines.push(payload.course_title.clone());
        lines.push(format!(
            "{} / {}",
            payload.manufacturer, payload.course_type
        ));
        lines.push(format!(
            "{} to {} ({} days)",
            payload.start_date, payload.end_date, payload.duration_days
        ));
        if let Some(trainer) = &payload.trainer {
            lines.push(format!("Trainer: {trainer}"));
        }
        if let Some(location) = &payload.location {
            lines.push(format!("Location: {location}"));
        }
        lines.push(String::new());
        lines.push(format!("Issued: {}", payload.issued_at));
        lines.push(format!("Valid until: {}", payload.expires_at));
        lines.push(String::new());
        lines.push("Verify this certificate at:".to_string());
        lines.push(payload.validation_url.clone());
        lines
    }
}

impl CertificateRenderer for MinimalPdfRenderer {
    fn render(&self, payload: &RenderPayload) -> Result<Vec<u8>, RenderError> {
        let lines = Self::lines(payload);
        if let Some(long) = lines.iter().find(|l| l.chars().count() > MAX_LINE_CHARS) {
            return Err(RenderError::UnrenderablePayload(format!(
                "line exceeds {MAX_LINE_CHARS} characters: {:.40}",
                long
            )));
        }

        // Content stream: one text block, 14pt leading.
        let mut content = String::from("BT\n/F1 18 Tf\n72 770 Td\n18 TL\n");
        for (i, line) in lines.iter().enumerate() {
            if i == 1 {
                // Body text is smaller than the heading.
                content.push_str("/F1 11 Tf\n14 TL\n");
            }
            content.push('(');
            content.push_str(&escape_pdf_text(line));
            content.push_str(") Tj\nT*\n");
        }
        content.push_str("ET\n");

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}endstream",
                content.len(),
                content
            ),
        ];

        let mut pdf: Vec<u8> = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_start = pdf.len();
        pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
        pdf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n",
                objects.len() + 1
            )
            .as_bytes(),
        );

        Ok(pdf)
    }
}

/// Escape the characters with special meaning inside PDF literal strings.
fn escape_pdf_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => out.push(c),
        }
    }
    out
}
