//! # Render Error Types

use thiserror::Error;

/// Errors from PDF rendering.
///
/// A render failure is a 5xx-class condition for the caller, but it never
/// invalidates the persisted certificate — re-rendering from stored fields
/// must always be possible.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The payload cannot be drawn (a field exceeds layout limits).
    #[error("unrenderable payload: {0}")]
    UnrenderablePayload(String),
}
