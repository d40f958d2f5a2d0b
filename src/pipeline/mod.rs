//! Pipeline stages for bill reformatting and export.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the rasterisation backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! messaging:  html ──▶ sanitize ──▶ compose
//!             (bill)   (lines)      (decorated text)
//!
//! document:   html ──▶ rasterize ──▶ tile ──▶ assemble
//!             (bill)   (backend)     (slices)  (PDF pages)
//! ```
//!
//! 1. [`sanitize`] — strip markup and collapse whitespace into the bill's
//!    visual line sequence
//! 2. [`compose`]  — classify each line into a bill section and render it
//!    with section-specific decoration
//! 3. [`tile`]     — slice a scaled raster height into fixed-size page
//!    windows; pure offset arithmetic, no rendering

pub mod compose;
pub mod sanitize;
pub mod tile;
