//! PDF backend for the export collaborator traits.
//!
//! Pages are assembled as lopdf objects directly: each image becomes a
//! DeviceRGB XObject and a `q cm Do Q` sequence in the page content stream.
//! Placements arrive in top-left page coordinates and are flipped into PDF's
//! bottom-left space here.

use image::GenericImageView;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

use crate::error::{HyugaError, HyugaResult};
use crate::export::{DocumentWriter, ImageCodec};
use crate::layout::Placement;

/// Codec backed by the `image` crate.
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    fn decode_dimensions(&self, bytes: &[u8]) -> HyugaResult<(u32, u32)> {
        let img = image::load_from_memory(bytes)?;
        Ok(img.dimensions())
    }
}

struct PendingPage {
    width: f64,
    height: f64,
    operations: Vec<Operation>,
    xobjects: Vec<(String, ObjectId)>,
}

/// Accumulates pages and draw commands, materializing the PDF on `save`.
pub struct PdfWriter {
    doc: Document,
    pages: Vec<PendingPage>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            doc: Document::with_version("1.5"),
            pages: Vec::new(),
        }
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriter for PdfWriter {
    fn begin_page(&mut self, width: f64, height: f64) -> HyugaResult<()> {
        self.pages.push(PendingPage {
            width,
            height,
            operations: Vec::new(),
            xobjects: Vec::new(),
        });
        Ok(())
    }

    fn draw_image(&mut self, bytes: &[u8], placement: &Placement) -> HyugaResult<()> {
        let page = self
            .pages
            .last_mut()
            .ok_or_else(|| HyugaError::InvalidArgument("draw_image before begin_page".into()))?;

        let rgb = image::load_from_memory(bytes)?.to_rgb8();
        let (w, h) = rgb.dimensions();
        let xobject = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => w as i64,
                "Height" => h as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            rgb.into_raw(),
        );
        let xobject_id = self.doc.add_object(xobject);
        let name = format!("Im{}", page.xobjects.len());
        page.xobjects.push((name.clone(), xobject_id));

        // Flip to bottom-left origin: the placement's y measures from the top.
        let x = placement.x as f32;
        let y = (page.height - placement.y - placement.h) as f32;
        page.operations.push(Operation::new("q", vec![]));
        page.operations.push(Operation::new(
            "cm",
            vec![
                Object::Real(placement.w as f32),
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(placement.h as f32),
                Object::Real(x),
                Object::Real(y),
            ],
        ));
        page.operations.push(Operation::new(
            "Do",
            vec![Object::Name(name.into_bytes())],
        ));
        page.operations.push(Operation::new("Q", vec![]));
        Ok(())
    }

    fn save(&mut self, output: &Path) -> HyugaResult<()> {
        let pages_id = self.doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();

        for page in self.pages.drain(..) {
            let content = Content {
                operations: page.operations,
            };
            let content_id = self
                .doc
                .add_object(Stream::new(dictionary! {}, content.encode()?));

            let mut xobjects = Dictionary::new();
            for (name, id) in page.xobjects {
                xobjects.set(name, Object::Reference(id));
            }
            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.width as f32),
                    Object::Real(page.height as f32),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! { "XObject" => xobjects },
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        self.doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.save(output)?;
        Ok(())
    }
}
