//! End-to-end tests for the document-export path.
//!
//! Rasterisation is host-specific, so these tests inject fakes: a rasteriser
//! that returns an image of known dimensions (the tiling arithmetic is fully
//! determined by them) and an assembler that records what it was asked to
//! lay out. The bundled PDF assembler is exercised for real and its output
//! reparsed.

use billfmt::{
    export_bill_to_bytes, export_bill_to_document, BillError, DocumentAssembler, ExportConfig,
    PageGeometry, PageSlice, PdfAssembler, Raster, RasterOptions, Rasterizer,
};
use image::{DynamicImage, Rgba, RgbaImage};
use std::sync::{Arc, Mutex};

// ── Fakes ────────────────────────────────────────────────────────────────────

/// Returns a solid raster of fixed dimensions, ignoring the HTML.
struct FixedRasterizer {
    width_px: u32,
    height_px: u32,
}

impl Rasterizer for FixedRasterizer {
    fn rasterize(&self, _html: &str, _options: &RasterOptions) -> Result<Raster, BillError> {
        Ok(Raster::from_image(DynamicImage::ImageRgba8(
            RgbaImage::from_pixel(self.width_px, self.height_px, Rgba([250, 250, 250, 255])),
        )))
    }
}

struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    fn rasterize(&self, _html: &str, _options: &RasterOptions) -> Result<Raster, BillError> {
        Err(BillError::RasterizationFailed {
            detail: "backend unavailable".into(),
        })
    }
}

/// Records the layout it was asked to assemble and returns dummy bytes.
#[derive(Default)]
struct RecordingAssembler {
    offsets_mm: Mutex<Vec<f64>>,
    image_height_mm: Mutex<Option<f64>>,
}

impl DocumentAssembler for RecordingAssembler {
    fn assemble(
        &self,
        _raster: &Raster,
        slices: &[PageSlice],
        geometry: &PageGeometry,
    ) -> Result<Vec<u8>, BillError> {
        *self.offsets_mm.lock().unwrap() = slices.iter().map(|s| s.y_offset_mm).collect();
        *self.image_height_mm.lock().unwrap() = Some(geometry.image_height_mm);
        Ok(b"fake-document".to_vec())
    }
}

struct FailingAssembler;

impl DocumentAssembler for FailingAssembler {
    fn assemble(
        &self,
        _raster: &Raster,
        _slices: &[PageSlice],
        _geometry: &PageGeometry,
    ) -> Result<Vec<u8>, BillError> {
        Err(BillError::DocumentAssemblyFailed {
            detail: "writer refused".into(),
        })
    }
}

const BILL: &str = "<p>BILL RECEIPT</p><p>TOTAL AMOUNT ₹500</p>";

// ── Tiling through the export path ───────────────────────────────────────────

/// A raster worth 2.5 pages of content must produce exactly 3 pages whose
/// windows tile the full height.
#[tokio::test]
async fn two_and_a_half_page_raster_exports_three_pages() {
    // 840 px wide at 210 mm page width → 0.25 mm/px; 2950 px → 737.5 mm,
    // exactly 2.5 default pages of 295 mm.
    let rasterizer = Arc::new(FixedRasterizer {
        width_px: 840,
        height_px: 2950,
    });
    let recorder = Arc::new(RecordingAssembler::default());
    let config = ExportConfig::default();

    let (bytes, stats) = export_bill_to_bytes(
        BILL,
        rasterizer,
        recorder.clone() as Arc<dyn DocumentAssembler>,
        &config,
    )
    .await
    .expect("export should succeed");

    assert_eq!(bytes, b"fake-document");
    assert_eq!(stats.page_count, 3);
    assert!((stats.scaled_height_mm - 737.5).abs() < 1e-9);

    let offsets = recorder.offsets_mm.lock().unwrap().clone();
    assert_eq!(offsets.len(), 3);
    assert_eq!(offsets[0], 0.0);
    assert!((offsets[1] - (-295.0)).abs() < 1e-9);
    assert!((offsets[2] - (-590.0)).abs() < 1e-9);

    // Content windows (page-height capped) must sum to the raster height.
    let scaled = recorder.image_height_mm.lock().unwrap().unwrap();
    let covered: f64 = offsets
        .iter()
        .map(|offset| (scaled + offset).min(config.page_height_mm))
        .sum();
    assert!((covered - scaled).abs() < 1e-9);
}

#[tokio::test]
async fn short_bill_exports_a_single_page() {
    let rasterizer = Arc::new(FixedRasterizer {
        width_px: 800,
        height_px: 1000, // 262.5 mm < one 295 mm page
    });
    let recorder = Arc::new(RecordingAssembler::default());

    let (_, stats) = export_bill_to_bytes(
        BILL,
        rasterizer,
        recorder.clone() as Arc<dyn DocumentAssembler>,
        &ExportConfig::default(),
    )
    .await
    .expect("export should succeed");

    assert_eq!(stats.page_count, 1);
    assert_eq!(recorder.offsets_mm.lock().unwrap().as_slice(), &[0.0]);
}

// ── Real PDF assembly ────────────────────────────────────────────────────────

#[tokio::test]
async fn exported_pdf_reparses_with_expected_page_count() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bills").join("bill-1042.pdf");

    let rasterizer = Arc::new(FixedRasterizer {
        width_px: 400,
        height_px: 1200, // 630 mm → 3 pages of 295 mm
    });

    let stats = export_bill_to_document(
        BILL,
        &path,
        rasterizer,
        Arc::new(PdfAssembler),
        &ExportConfig::default(),
    )
    .await
    .expect("export should succeed");

    assert_eq!(stats.page_count, 3);
    assert_eq!(stats.raster_width_px, 400);
    assert_eq!(stats.raster_height_px, 1200);

    let bytes = std::fs::read(&path).expect("document file must exist");
    assert!(bytes.starts_with(b"%PDF"));

    let parsed = lopdf::Document::load_mem(&bytes).expect("output must reparse");
    assert_eq!(parsed.get_pages().len(), 3);
}

/// Stats must serialise cleanly — callers log them as JSON.
#[tokio::test]
async fn export_stats_serialise_to_json() {
    let rasterizer = Arc::new(FixedRasterizer {
        width_px: 800,
        height_px: 1000,
    });
    let recorder = Arc::new(RecordingAssembler::default());

    let (_, stats) = export_bill_to_bytes(
        BILL,
        rasterizer,
        recorder as Arc<dyn DocumentAssembler>,
        &ExportConfig::default(),
    )
    .await
    .expect("export should succeed");

    let json = serde_json::to_string_pretty(&stats).expect("stats must serialise");
    assert!(json.contains("\"page_count\": 1"));
    assert!(json.contains("\"raster_height_px\": 1000"));
}

// ── Failure modes ────────────────────────────────────────────────────────────

#[tokio::test]
async fn rasterizer_failure_leaves_no_file_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bill.pdf");

    let result = export_bill_to_document(
        BILL,
        &path,
        Arc::new(FailingRasterizer),
        Arc::new(PdfAssembler),
        &ExportConfig::default(),
    )
    .await;

    assert!(matches!(
        result,
        Err(BillError::RasterizationFailed { .. })
    ));
    assert!(!path.exists(), "no document may exist after a failure");
    assert!(
        !path.with_extension("pdf.tmp").exists(),
        "no staging file may survive a failure"
    );
}

#[tokio::test]
async fn assembler_failure_leaves_no_file_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bill.pdf");

    let result = export_bill_to_document(
        BILL,
        &path,
        Arc::new(FixedRasterizer {
            width_px: 400,
            height_px: 400,
        }),
        Arc::new(FailingAssembler),
        &ExportConfig::default(),
    )
    .await;

    assert!(matches!(
        result,
        Err(BillError::DocumentAssemblyFailed { .. })
    ));
    assert!(!path.exists());
}

#[tokio::test]
async fn concurrent_exports_are_independent() {
    // No shared state across calls: two exports of different bills may run
    // at once and neither disturbs the other's output.
    let dir = tempfile::tempdir().expect("tempdir");
    let path_a = dir.path().join("a.pdf");
    let path_b = dir.path().join("b.pdf");

    let raster_a = Arc::new(FixedRasterizer {
        width_px: 400,
        height_px: 400, // 210 mm → 1 page
    });
    let raster_b = Arc::new(FixedRasterizer {
        width_px: 400,
        height_px: 1200, // 630 mm → 3 pages
    });

    let config = ExportConfig::default();
    let (a, b) = tokio::join!(
        export_bill_to_document(BILL, &path_a, raster_a, Arc::new(PdfAssembler), &config),
        export_bill_to_document(BILL, &path_b, raster_b, Arc::new(PdfAssembler), &config),
    );

    assert_eq!(a.expect("export a").page_count, 1);
    assert_eq!(b.expect("export b").page_count, 3);
    assert!(path_a.exists());
    assert!(path_b.exists());
}
