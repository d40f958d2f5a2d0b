//! Built-in PDF assembly: one document page per tile slice.
//!
//! Each page draws the *full* bill raster once, shifted up by the slice
//! offset, so exactly one page-height window of content is visible inside
//! the page's media box. The raster embeds as a single shared image XObject;
//! pages only differ in their tiny content streams, which keeps a 3-page
//! export barely larger than a 1-page one.
//!
//! The image is stored as Flate-compressed raw RGB. PDF has no native PNG
//! filter; deflating the decoded pixels keeps the embedding lossless, which
//! matters for small bill text the same way it does for the messaging
//! capture.

use crate::error::BillError;
use crate::pipeline::tile::PageSlice;
use crate::raster::{DocumentAssembler, PageGeometry, Raster};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Write;
use tracing::debug;

/// PDF user-space points per millimetre.
const MM_TO_PT: f64 = 72.0 / 25.4;

/// Coordinates round to whole points; at page scale the sub-point error is
/// far below one raster pixel.
fn pt(mm: f64) -> i64 {
    (mm * MM_TO_PT).round() as i64
}

/// lopdf-backed [`DocumentAssembler`] producing a multi-page PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfAssembler;

impl DocumentAssembler for PdfAssembler {
    fn assemble(
        &self,
        raster: &Raster,
        slices: &[PageSlice],
        geometry: &PageGeometry,
    ) -> Result<Vec<u8>, BillError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let image_id = doc.add_object(image_xobject(raster)?);

        let mut page_ids = Vec::with_capacity(slices.len());
        for slice in slices {
            let content = page_content(slice, geometry);
            let encoded = content
                .encode()
                .map_err(|e| BillError::DocumentAssemblyFailed {
                    detail: format!("content stream encoding failed: {e}"),
                })?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id);
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<_>>(),
                "Count" => page_ids.len() as i64,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im0" => image_id },
                },
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    pt(geometry.page_width_mm).into(),
                    pt(geometry.page_height_mm).into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| BillError::DocumentAssemblyFailed {
                detail: format!("PDF serialisation failed: {e}"),
            })?;

        debug!(
            "Assembled {}-page PDF, {} bytes",
            slices.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Build the shared image XObject from the raster's pixels.
fn image_xobject(raster: &Raster) -> Result<Stream, BillError> {
    let rgb = raster.image.to_rgb8();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(rgb.as_raw())
        .and_then(|_| encoder.finish())
        .map(|data| {
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => raster.width_px as i64,
                    "Height" => raster.height_px as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                data,
            )
        })
        .map_err(|e| BillError::DocumentAssemblyFailed {
            detail: format!("image compression failed: {e}"),
        })
}

/// Content stream drawing the full raster at this slice's vertical offset.
///
/// PDF y runs from the page bottom; the slice offset is measured from the
/// page top, so the image bottom lands at
/// `page_height - offset - image_height`.
fn page_content(slice: &PageSlice, geometry: &PageGeometry) -> Content {
    let width = pt(geometry.page_width_mm);
    let height = pt(geometry.image_height_mm);
    let y = pt(geometry.page_height_mm - slice.y_offset_mm - geometry.image_height_mm);

    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    0.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn test_raster(width: u32, height: u32) -> Raster {
        Raster::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([240, 240, 240, 255]),
        )))
    }

    fn test_geometry(image_height_mm: f64) -> PageGeometry {
        PageGeometry {
            page_width_mm: 210.0,
            page_height_mm: 295.0,
            image_height_mm,
        }
    }

    #[test]
    fn single_page_pdf_has_magic_and_one_page() {
        let raster = test_raster(16, 16);
        let slices = vec![PageSlice { y_offset_mm: 0.0 }];
        let bytes = PdfAssembler
            .assemble(&raster, &slices, &test_geometry(120.0))
            .expect("assembly should succeed");

        assert!(bytes.starts_with(b"%PDF"));
        let parsed = Document::load_mem(&bytes).expect("output must reparse");
        assert_eq!(parsed.get_pages().len(), 1);
    }

    #[test]
    fn page_count_matches_slice_count() {
        let raster = test_raster(16, 64);
        let slices = vec![
            PageSlice { y_offset_mm: 0.0 },
            PageSlice { y_offset_mm: -295.0 },
            PageSlice { y_offset_mm: -590.0 },
        ];
        let bytes = PdfAssembler
            .assemble(&raster, &slices, &test_geometry(737.5))
            .expect("assembly should succeed");

        let parsed = Document::load_mem(&bytes).expect("output must reparse");
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn first_page_places_image_top_at_page_top() {
        // offset 0, 100 mm tall image on a 295 mm page → bottom at 195 mm
        let content = page_content(&PageSlice { y_offset_mm: 0.0 }, &test_geometry(100.0));
        let cm = &content.operations[1];
        assert_eq!(cm.operator, "cm");
        assert_eq!(cm.operands[5], Object::Integer(pt(195.0)));
    }

    #[test]
    fn later_pages_shift_the_image_up() {
        // offset -295: image bottom at 295 - (-295) - 100 = 490 mm
        let content = page_content(&PageSlice { y_offset_mm: -295.0 }, &test_geometry(100.0));
        assert_eq!(content.operations[1].operands[5], Object::Integer(pt(490.0)));
    }
}
