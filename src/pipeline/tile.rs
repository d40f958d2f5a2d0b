//! Page tiling: fixed-height page windows over a scaled raster.
//!
//! The bill renders as one tall raster. Scaling its width to the page width
//! gives a content height in millimetres; tiling walks that height in
//! page-sized steps. Every page draws the *full* raster, shifted up by the
//! page's offset, so exactly one page-height window of content shows — the
//! same trick page-based document writers use for oversized images. The
//! final page may show blank padding below the last content row.

use serde::Serialize;

/// One page-sized window into the full-height raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSlice {
    /// Vertical offset (mm) at which the full raster is drawn on this page.
    ///
    /// 0 on the first page, negative afterwards: page N draws the raster
    /// shifted up so rows `[N·page_h, (N+1)·page_h)` land in the window.
    pub y_offset_mm: f64,
}

impl PageSlice {
    /// Height of raster content visible on this page, excluding the blank
    /// padding that may follow the last content row on the final page.
    pub fn content_height_mm(&self, scaled_height_mm: f64, page_height_mm: f64) -> f64 {
        (scaled_height_mm + self.y_offset_mm).min(page_height_mm)
    }
}

/// Scale the raster height into page-width millimetres.
///
/// The raster spans the full page width, so one horizontal pixel equals
/// `page_width_mm / raster_width_px` millimetres and the height scales by
/// the same factor.
pub fn scaled_height_mm(raster_width_px: u32, raster_height_px: u32, page_width_mm: f64) -> f64 {
    raster_height_px as f64 * page_width_mm / raster_width_px as f64
}

/// Tile the scaled raster height into page windows.
///
/// The first page sits at offset 0; each further page's offset is
/// `height_left - scaled_height_mm`, taken while the remaining height is
/// still ≥ 0. The offsets tile the raster height with no gaps and no
/// overlaps.
pub fn tile(scaled_height_mm: f64, page_height_mm: f64) -> Vec<PageSlice> {
    let mut slices = vec![PageSlice { y_offset_mm: 0.0 }];
    let mut height_left = scaled_height_mm - page_height_mm;

    while height_left >= 0.0 {
        slices.push(PageSlice {
            y_offset_mm: height_left - scaled_height_mm,
        });
        height_left -= page_height_mm;
    }

    slices
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_H: f64 = 295.0;

    #[test]
    fn half_page_raster_yields_single_page() {
        let slices = tile(PAGE_H / 2.0, PAGE_H);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].y_offset_mm, 0.0);
    }

    #[test]
    fn two_and_a_half_pages_yield_three_slices() {
        let scaled = 2.5 * PAGE_H;
        let slices = tile(scaled, PAGE_H);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].y_offset_mm, 0.0);
        assert!((slices[1].y_offset_mm - (-PAGE_H)).abs() < 1e-9);
        assert!((slices[2].y_offset_mm - (-2.0 * PAGE_H)).abs() < 1e-9);
    }

    #[test]
    fn content_windows_tile_the_full_raster_height() {
        let scaled = 2.5 * PAGE_H;
        let slices = tile(scaled, PAGE_H);
        let total: f64 = slices
            .iter()
            .map(|s| s.content_height_mm(scaled, PAGE_H))
            .sum();
        assert!((total - scaled).abs() < 1e-9, "windows must cover {scaled} mm, got {total}");
    }

    #[test]
    fn offsets_have_no_gaps_or_overlaps() {
        let scaled = 3.2 * PAGE_H;
        let slices = tile(scaled, PAGE_H);
        for (i, pair) in slices.windows(2).enumerate() {
            let step = pair[0].y_offset_mm - pair[1].y_offset_mm;
            assert!((step - PAGE_H).abs() < 1e-9, "step {i} was {step}");
        }
    }

    #[test]
    fn exact_page_multiple_keeps_the_boundary_page() {
        // remaining height reaches exactly 0 — the loop still takes one more
        // window, matching the shipped offset arithmetic
        let slices = tile(PAGE_H, PAGE_H);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[1].content_height_mm(PAGE_H, PAGE_H), 0.0);
    }

    #[test]
    fn scaling_follows_page_width_ratio() {
        // 800 px wide, 1600 px tall at 210 mm page width → 420 mm of content
        let scaled = scaled_height_mm(800, 1600, 210.0);
        assert!((scaled - 420.0).abs() < 1e-9);
        assert_eq!(tile(scaled, PAGE_H).len(), 2);
    }
}
