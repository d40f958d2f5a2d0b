//! Bill document export: rasterise, tile, assemble, save.
//!
//! The only suspension points in the crate live here — the rasterisation
//! and assembly backends are blocking, CPU-bound calls and run inside
//! `tokio::task::spawn_blocking` so they never stall the async host. The
//! two backends run sequentially; nothing about exporting a single bill
//! benefits from parallelism, and each invocation is independent and
//! reentrant — no state is shared across calls.
//!
//! Saving is atomic: bytes land in a sibling temp file which is renamed
//! over the target, so a failure at any stage leaves no partial document
//! behind.

use crate::config::ExportConfig;
use crate::error::BillError;
use crate::pipeline::tile;
use crate::raster::{DocumentAssembler, PageGeometry, RasterOptions, Rasterizer};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Statistics describing a completed export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportStats {
    pub page_count: usize,
    pub raster_width_px: u32,
    pub raster_height_px: u32,
    /// Raster height scaled into page-width millimetres.
    pub scaled_height_mm: f64,
    pub render_duration_ms: u64,
    pub assemble_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Export a rendered HTML bill as in-memory document bytes.
///
/// # Errors
/// [`BillError::RasterizationFailed`] or
/// [`BillError::DocumentAssemblyFailed`] when a backend fails; backends are
/// required to have released any transient host resources before either
/// error reaches the caller.
pub async fn export_bill_to_bytes(
    html: &str,
    rasterizer: Arc<dyn Rasterizer>,
    assembler: Arc<dyn DocumentAssembler>,
    config: &ExportConfig,
) -> Result<(Vec<u8>, ExportStats), BillError> {
    let total_start = Instant::now();

    // ── Step 1: Rasterise the bill off the async runtime ─────────────────
    let options = RasterOptions {
        viewport_width_px: config.raster_width_px,
        scale: config.raster_scale,
    };
    let render_start = Instant::now();
    let raster = {
        let rasterizer = Arc::clone(&rasterizer);
        let html = html.to_string();
        let options = options.clone();
        tokio::task::spawn_blocking(move || rasterizer.rasterize(&html, &options))
            .await
            .map_err(|e| BillError::Internal(format!("Raster task panicked: {e}")))??
    };
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    debug!(
        "Rasterised bill → {}×{} px in {}ms",
        raster.width_px, raster.height_px, render_duration_ms
    );

    // ── Step 2: Tile the scaled height into page windows ─────────────────
    let scaled_height_mm =
        tile::scaled_height_mm(raster.width_px, raster.height_px, config.page_width_mm);
    let slices = tile::tile(scaled_height_mm, config.page_height_mm);
    info!(
        "Tiled {:.1} mm of content into {} pages",
        scaled_height_mm,
        slices.len()
    );

    let geometry = PageGeometry {
        page_width_mm: config.page_width_mm,
        page_height_mm: config.page_height_mm,
        image_height_mm: scaled_height_mm,
    };

    // ── Step 3: Assemble the document ────────────────────────────────────
    let raster_width_px = raster.width_px;
    let raster_height_px = raster.height_px;
    let assemble_start = Instant::now();
    let page_count = slices.len();
    let bytes = {
        let assembler = Arc::clone(&assembler);
        tokio::task::spawn_blocking(move || assembler.assemble(&raster, &slices, &geometry))
            .await
            .map_err(|e| BillError::Internal(format!("Assembly task panicked: {e}")))??
    };
    let assemble_duration_ms = assemble_start.elapsed().as_millis() as u64;

    let stats = ExportStats {
        page_count,
        raster_width_px,
        raster_height_px,
        scaled_height_mm,
        render_duration_ms,
        assemble_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Export complete: {} pages, {} bytes, {}ms total",
        stats.page_count,
        bytes.len(),
        stats.total_duration_ms
    );

    Ok((bytes, stats))
}

/// Export a rendered HTML bill to a document file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn export_bill_to_document(
    html: &str,
    output_path: impl AsRef<Path>,
    rasterizer: Arc<dyn Rasterizer>,
    assembler: Arc<dyn DocumentAssembler>,
    config: &ExportConfig,
) -> Result<ExportStats, BillError> {
    let (bytes, stats) = export_bill_to_bytes(html, rasterizer, assembler, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BillError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &bytes)
        .await
        .map_err(|e| BillError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| BillError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Saved bill document to {}", path.display());
    Ok(stats)
}
