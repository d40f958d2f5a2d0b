//! Error types for the billfmt library.
//!
//! Only two paths in the crate can fail: the document-export path (a raster
//! or assembly backend misbehaving, or the output file not being writable)
//! and phone-number normalisation. Everything in the text pipeline is
//! infallible by design — malformed HTML degrades to noisier text, and every
//! classification rule has a fallback rendering, so callers formatting a
//! bill for messaging never need to handle an error.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the billfmt library.
#[derive(Debug, Error)]
pub enum BillError {
    // ── Export errors ─────────────────────────────────────────────────────
    /// The rasterisation backend failed to capture the bill.
    #[error("Failed to render the bill for export: {detail}\nPlease try again.")]
    RasterizationFailed { detail: String },

    /// The document-assembly backend failed to produce the page document.
    #[error("Failed to assemble the bill document: {detail}\nPlease try again.")]
    DocumentAssemblyFailed { detail: String },

    /// Could not create or write the output document file.
    #[error("Failed to write document file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Messaging errors ──────────────────────────────────────────────────
    /// The supplied phone number has a digit count that cannot be
    /// normalised into a country-code + national-number form.
    #[error("Invalid phone number '{raw}': {digits} digits after stripping formatting\nExpected a 10-digit national number, optionally with a country code or trunk '0' prefix.")]
    InvalidPhoneNumber { raw: String, digits: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rasterization_display_suggests_retry() {
        let e = BillError::RasterizationFailed {
            detail: "backend unavailable".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("backend unavailable"));
        assert!(msg.contains("try again"), "got: {msg}");
    }

    #[test]
    fn invalid_phone_display_includes_digit_count() {
        let e = BillError::InvalidPhoneNumber {
            raw: "12-3".into(),
            digits: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("12-3"));
        assert!(msg.contains("3 digits"));
    }

    #[test]
    fn output_write_failed_carries_source() {
        let e = BillError::OutputWriteFailed {
            path: PathBuf::from("/tmp/bill.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/tmp/bill.pdf"));
        assert!(std::error::Error::source(&e).is_some());
    }
}
