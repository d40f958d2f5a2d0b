//! Messaging-text entry point.
//!
//! The simpler of the two export surfaces: sanitise the rendered HTML into
//! its visual line sequence, then compose the decorated plain-text bill.
//! Infallible end to end — see [`crate::error`] for the rationale.

use crate::pipeline::{compose, sanitize};
use tracing::debug;

/// Reformat a rendered HTML bill into messaging-ready plain text.
///
/// The output is a best-effort semantic re-layout, not a transcription:
/// section headers, separators and markers are re-derived from the line
/// content, so styling differences in the source HTML do not leak through.
pub fn format_bill_text(html: &str) -> String {
    let lines = sanitize::sanitize(html);
    debug!("Sanitised bill into {} lines", lines.len());

    let text = compose::compose(&lines);
    debug!("Composed {} chars of messaging text", text.len());
    text
}
