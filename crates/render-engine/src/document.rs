//! Paged document assembly.
//!
//! The document pipeline only talks to [`DocumentAssembler`]; the default
//! implementation writes a PDF with `printpdf`.

use printpdf::{
    ColorBits, ColorSpace, Image, ImageFilter, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfPageIndex, Px,
};

use carelab_common::error::{CarelabError, CarelabResult};

use crate::encode::{EncodedImage, ImageFormat};

/// Resolution images are declared at before they are scaled onto the page.
const IMAGE_DPI: f32 = 300.0;

const MM_PER_INCH: f32 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    A4,
}

impl PageSize {
    /// Portrait width and height in millimetres.
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
        }
    }
}

/// Geometry of every page in a document. Units are millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSetup {
    pub orientation: Orientation,
    pub size: PageSize,
}

impl PageSetup {
    pub fn a4_portrait() -> Self {
        Self {
            orientation: Orientation::Portrait,
            size: PageSize::A4,
        }
    }

    /// Page width and height in millimetres after orientation.
    pub fn page_mm(&self) -> (f32, f32) {
        let (w, h) = self.size.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Builds a paged document one image at a time.
///
/// A new document starts with one empty page. Coordinates passed to
/// [`add_image`](Self::add_image) are millimetres from the top-left corner
/// of the current page.
pub trait DocumentAssembler {
    /// Size of every page in millimetres.
    fn page_size_mm(&self) -> (f32, f32);

    /// Place an encoded image on the current page.
    fn add_image(
        &mut self,
        image: &EncodedImage,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> CarelabResult<()>;

    /// Append a page and make it current.
    fn add_page(&mut self) -> CarelabResult<()>;

    fn page_count(&self) -> usize;

    /// Serialise the finished document.
    fn finish(self: Box<Self>) -> CarelabResult<Vec<u8>>;
}

/// Opens a fresh [`DocumentAssembler`] for each export.
pub trait DocumentFactory: Send + Sync {
    fn begin(&self, setup: &PageSetup, title: &str) -> CarelabResult<Box<dyn DocumentAssembler>>;

    fn name(&self) -> &str;
}

/// PDF output through `printpdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfDocumentFactory;

impl DocumentFactory for PdfDocumentFactory {
    fn begin(&self, setup: &PageSetup, title: &str) -> CarelabResult<Box<dyn DocumentAssembler>> {
        Ok(Box::new(PdfAssembler::new(setup, title)))
    }

    fn name(&self) -> &str {
        "printpdf"
    }
}

pub struct PdfAssembler {
    doc: PdfDocumentReference,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    page_mm: (f32, f32),
    pages: usize,
}

impl PdfAssembler {
    pub fn new(setup: &PageSetup, title: &str) -> Self {
        let page_mm = setup.page_mm();
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(page_mm.0), Mm(page_mm.1), "Page 1");
        Self {
            doc,
            page,
            layer,
            page_mm,
            pages: 1,
        }
    }
}

impl DocumentAssembler for PdfAssembler {
    fn page_size_mm(&self) -> (f32, f32) {
        self.page_mm
    }

    fn add_image(
        &mut self,
        image: &EncodedImage,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> CarelabResult<()> {
        if image.width == 0 || image.height == 0 {
            return Err(CarelabError::assembly("Cannot place an empty image"));
        }
        let filter = match image.format {
            ImageFormat::Jpeg => ImageFilter::DCT,
        };

        let xobject = ImageXObject {
            width: Px(image.width as usize),
            height: Px(image.height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: image.data.clone(),
            image_filter: Some(filter),
            smask: None,
            clipping_bbox: None,
        };

        // Natural size at IMAGE_DPI, then stretch to the requested box.
        let natural_w = image.width as f32 / IMAGE_DPI * MM_PER_INCH;
        let natural_h = image.height as f32 / IMAGE_DPI * MM_PER_INCH;
        let (_, page_h) = self.page_mm;

        let layer = self.doc.get_page(self.page).get_layer(self.layer);
        Image::from(xobject).add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(page_h - y - h)),
                scale_x: Some(w / natural_w),
                scale_y: Some(h / natural_h),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn add_page(&mut self) -> CarelabResult<()> {
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(self.page_mm.0),
            Mm(self.page_mm.1),
            format!("Page {}", self.pages),
        );
        self.page = page;
        self.layer = layer;
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn finish(self: Box<Self>) -> CarelabResult<Vec<u8>> {
        let pages = self.pages;
        let bytes = self
            .doc
            .save_to_bytes()
            .map_err(|e| CarelabError::assembly(format!("Failed to write PDF: {e}")))?;
        tracing::debug!(pages, bytes = bytes.len(), "PDF assembled");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_jpeg;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_a4_dimensions() {
        assert_eq!(PageSetup::a4_portrait().page_mm(), (210.0, 297.0));
        let landscape = PageSetup {
            orientation: Orientation::Landscape,
            size: PageSize::A4,
        };
        assert_eq!(landscape.page_mm(), (297.0, 210.0));
    }

    #[test]
    fn test_pdf_with_images_per_page() {
        let jpeg = encode_jpeg(&RgbaImage::from_pixel(79, 112, Rgba([3, 105, 161, 255])), 90)
            .unwrap();
        let mut doc = PdfDocumentFactory
            .begin(&PageSetup::a4_portrait(), "test")
            .unwrap();
        let (w, h) = doc.page_size_mm();

        doc.add_image(&jpeg, 0.0, 0.0, w, h).unwrap();
        doc.add_page().unwrap();
        doc.add_image(&jpeg, 0.0, 0.0, w, h).unwrap();
        assert_eq!(doc.page_count(), 2);

        let bytes = doc.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_empty_image_rejected() {
        let mut doc = PdfAssembler::new(&PageSetup::a4_portrait(), "empty");
        let empty = EncodedImage {
            format: ImageFormat::Jpeg,
            width: 0,
            height: 0,
            data: Vec::new(),
        };
        assert!(doc.add_image(&empty, 0.0, 0.0, 10.0, 10.0).is_err());
    }
}
