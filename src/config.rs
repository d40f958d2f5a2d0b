//! Configuration for bill document export.
//!
//! All export behaviour is controlled through [`ExportConfig`], built via its
//! [`ExportConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a config across call sites, serialise it for logging, and diff
//! two runs to understand why their outputs differ.

use crate::error::BillError;
use serde::{Deserialize, Serialize};

/// Configuration for exporting a bill as a paginated document.
///
/// Built via [`ExportConfig::builder()`] or [`ExportConfig::default()`].
///
/// # Example
/// ```rust
/// use billfmt::ExportConfig;
///
/// let config = ExportConfig::builder()
///     .raster_width_px(800)
///     .raster_scale(2.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Page width in millimetres. Default: 210 (A4 width).
    ///
    /// The raster is scaled so its full width spans the page width; all
    /// vertical tiling arithmetic derives from this.
    pub page_width_mm: f64,

    /// Page height in millimetres. Default: 295.
    ///
    /// Slightly shy of ISO A4's 297 mm — the margin the bill template is
    /// tuned for. Every page window has exactly this height; the final page
    /// may show blank padding below the last content row.
    pub page_height_mm: f64,

    /// Layout width in CSS pixels handed to the rasterisation backend.
    /// Default: 800.
    ///
    /// Fixing the layout width makes output deterministic regardless of the
    /// caller's viewport: the same bill always wraps, tiles, and paginates
    /// the same way.
    pub raster_width_px: u32,

    /// Supersampling factor applied when capturing. Default: 2.0.
    ///
    /// Capturing at 2× keeps small bill text crisp once the raster is scaled
    /// down to page width. Higher factors cost memory quadratically.
    pub raster_scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 295.0,
            raster_width_px: 800,
            raster_scale: 2.0,
        }
    }
}

impl ExportConfig {
    /// Create a new builder for `ExportConfig`.
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExportConfig`].
#[derive(Debug)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    pub fn page_width_mm(mut self, mm: f64) -> Self {
        self.config.page_width_mm = mm;
        self
    }

    pub fn page_height_mm(mut self, mm: f64) -> Self {
        self.config.page_height_mm = mm;
        self
    }

    pub fn raster_width_px(mut self, px: u32) -> Self {
        self.config.raster_width_px = px.max(100);
        self
    }

    pub fn raster_scale(mut self, scale: f32) -> Self {
        self.config.raster_scale = scale.clamp(0.5, 4.0);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExportConfig, BillError> {
        let c = &self.config;
        if !(c.page_width_mm > 0.0 && c.page_height_mm > 0.0) {
            return Err(BillError::InvalidConfig(format!(
                "Page dimensions must be positive, got {}×{} mm",
                c.page_width_mm, c.page_height_mm
            )));
        }
        if c.raster_width_px == 0 {
            return Err(BillError::InvalidConfig(
                "Raster width must be ≥ 1 px".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_bill_template_geometry() {
        let c = ExportConfig::default();
        assert_eq!(c.page_width_mm, 210.0);
        assert_eq!(c.page_height_mm, 295.0);
        assert_eq!(c.raster_width_px, 800);
    }

    #[test]
    fn builder_clamps_raster_settings() {
        let c = ExportConfig::builder()
            .raster_width_px(10)
            .raster_scale(9.0)
            .build()
            .unwrap();
        assert_eq!(c.raster_width_px, 100);
        assert_eq!(c.raster_scale, 4.0);
    }

    #[test]
    fn negative_page_height_rejected() {
        let result = ExportConfig::builder().page_height_mm(-5.0).build();
        assert!(matches!(result, Err(BillError::InvalidConfig(_))));
    }
}
