//! # billfmt
//!
//! Reformat rendered HTML restaurant bills into messaging-ready plain text
//! and paginated PDF exports.
//!
//! ## Why this crate?
//!
//! A point-of-sale bill renders as styled HTML, but the two places it has to
//! go next accept neither HTML nor styling: a text-only messaging channel,
//! and a fixed-page-size document export. Rather than transcribing the HTML
//! pixel-for-pixel, this crate re-derives the bill's structure from its text
//! — classifying each line into a bill section and decorating it for
//! messaging — and separately tiles a rasterised capture of the same HTML
//! into 210×295 mm document pages.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML bill
//!  │
//!  ├─ messaging path
//!  │   ├─ 1. Sanitise  strip markup, decode entities, collapse whitespace
//!  │   ├─ 2. Compose   classify lines into bill sections, decorate
//!  │   └─ 3. Message   order/handoff templates + WhatsApp deep link
//!  │
//!  └─ document path
//!      ├─ 1. Rasterise capture at a fixed layout width (injected backend)
//!      ├─ 2. Tile      slice the scaled height into page windows
//!      └─ 3. Assemble  one window per PDF page, saved atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use billfmt::{build_messaging_link, format_bill_text, LinkVariant};
//!
//! let html = "<h2>Restaurant ABC</h2><p>BILL RECEIPT</p><p>Table: 5</p>";
//! let text = format_bill_text(html);
//! assert!(text.contains("📋 *BILL RECEIPT*"));
//!
//! let link = build_messaging_link("9876543210", &text, LinkVariant::Mobile).unwrap();
//! assert!(link.starts_with("https://wa.me/919876543210?text="));
//! ```
//!
//! The document path consumes a [`Rasterizer`] capability the host supplies
//! (a headless browser, a WebView — anything that can turn HTML into one
//! tall image); the bundled [`PdfAssembler`] handles the rest:
//!
//! ```rust,no_run
//! use billfmt::{export_bill_to_document, ExportConfig, PdfAssembler};
//! use std::sync::Arc;
//!
//! # async fn run(rasterizer: Arc<dyn billfmt::Rasterizer>) -> Result<(), billfmt::BillError> {
//! let stats = export_bill_to_document(
//!     "<p>BILL RECEIPT</p>",
//!     "bill-1042.pdf",
//!     rasterizer,
//!     Arc::new(PdfAssembler),
//!     &ExportConfig::default(),
//! )
//! .await?;
//! println!("saved {} pages", stats.page_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `billfmt` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! billfmt = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod assemble;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod message;
pub mod pipeline;
pub mod raster;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use assemble::PdfAssembler;
pub use config::{ExportConfig, ExportConfigBuilder};
pub use error::BillError;
pub use export::{export_bill_to_bytes, export_bill_to_document, ExportStats};
pub use format::format_bill_text;
pub use message::{
    build_document_handoff_message, build_messaging_link, build_order_message,
    normalize_phone_number, LinkVariant, OrderSummary, DEFAULT_COUNTRY_CODE,
};
pub use pipeline::tile::{scaled_height_mm, tile, PageSlice};
pub use raster::{DocumentAssembler, PageGeometry, Raster, RasterOptions, Rasterizer};
