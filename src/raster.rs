//! Rasterisation and document-assembly capabilities.
//!
//! Rendering HTML into pixels is host-specific — a headless browser, an
//! embedded WebView, a print service. The export pipeline therefore consumes
//! rasterisation through a narrow trait rather than owning it, and the same
//! goes for turning tiled pages into a document. Two things follow:
//!
//! * the tiling arithmetic in [`crate::pipeline::tile`] and the export
//!   orchestration in [`crate::export`] are testable with fakes (inject a
//!   raster of known height, record what gets assembled);
//! * backends own whatever transient host resources they need (an off-screen
//!   DOM host, a browser tab) and must release them before returning —
//!   success or failure — so no host state leaks past a single call.
//!
//! Both traits are blocking: rasterisation is CPU-bound and most rendering
//! hosts are not async-safe. The export path drives them through
//! `tokio::task::spawn_blocking`.

use crate::error::BillError;
use crate::pipeline::tile::PageSlice;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use serde::Serialize;
use std::fmt;
use std::io::Cursor;
use tracing::debug;

/// Options passed to a [`Rasterizer`] backend.
#[derive(Debug, Clone, Serialize)]
pub struct RasterOptions {
    /// Layout width in CSS pixels. Fixed by config so the capture is
    /// deterministic regardless of any caller viewport.
    pub viewport_width_px: u32,

    /// Supersampling factor for text sharpness.
    pub scale: f32,
}

/// A captured raster of the rendered bill: one tall image at a fixed width.
#[derive(Clone)]
pub struct Raster {
    pub width_px: u32,
    pub height_px: u32,
    pub image: DynamicImage,
}

impl Raster {
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            width_px: image.width(),
            height_px: image.height(),
            image,
        }
    }

    /// PNG-encode the raster as a `data:` URL.
    ///
    /// PNG is lossless — compression artefacts on small bill text are
    /// exactly what a document export must avoid.
    pub fn to_png_data_url(&self) -> Result<String, BillError> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| BillError::RasterizationFailed {
                detail: format!("PNG encoding failed: {e}"),
            })?;

        let b64 = STANDARD.encode(&buf);
        debug!("Encoded raster → {} bytes base64", b64.len());
        Ok(format!("data:image/png;base64,{b64}"))
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("image", &"<DynamicImage>")
            .finish()
    }
}

/// Renders an HTML bill into a single tall raster at a fixed layout width.
///
/// Implementations must clean up any transient host resources before
/// returning, whether rasterisation succeeded or failed.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, html: &str, options: &RasterOptions) -> Result<Raster, BillError>;
}

/// Page geometry shared between tiling and assembly.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageGeometry {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    /// Full raster height scaled into page-width millimetres.
    pub image_height_mm: f64,
}

/// Assembles tiled page slices of a raster into final document bytes.
///
/// The built-in PDF backend lives in [`crate::assemble`]; tests inject
/// recording fakes instead.
pub trait DocumentAssembler: Send + Sync {
    fn assemble(
        &self,
        raster: &Raster,
        slices: &[PageSlice],
        geometry: &PageGeometry,
    ) -> Result<Vec<u8>, BillError>;
}
