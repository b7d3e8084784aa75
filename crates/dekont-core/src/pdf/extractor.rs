//! PDF text-layer and page-image extraction using lopdf and pdf-extract.

use std::panic::{self, AssertUnwindSafe};

use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, Rgba};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load a PDF straight from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        Ok(extractor)
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Per-page text through lopdf's own content-stream reader.
    fn lopdf_page_texts(&self, max_pages: usize) -> Result<Vec<String>> {
        let doc = self.document()?;
        let last = (self.page_count() as usize).min(max_pages) as u32;

        let mut pages = Vec::with_capacity(last as usize);
        for page in 1..=last {
            let text = panic::catch_unwind(AssertUnwindSafe(|| doc.extract_text(&[page])))
                .map_err(|_| PdfError::TextExtraction(format!("lopdf panicked on page {page}")))?
                .unwrap_or_default();
            pages.push(text);
        }
        Ok(pages)
    }

    /// Look up a page attribute, following `/Parent` for inheritable keys.
    fn inherited_attribute<'a>(
        &self,
        doc: &'a Document,
        node_id: ObjectId,
        key: &[u8],
    ) -> Option<&'a Object> {
        let dict = doc.get_dictionary(node_id).ok()?;
        if let Ok(value) = dict.get(key) {
            return doc.dereference(value).ok().map(|(_, obj)| obj);
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => self.inherited_attribute(doc, *parent_id, key),
            _ => None,
        }
    }

    fn page_resources(&self, doc: &Document, page_id: ObjectId) -> Option<Dictionary> {
        match self.inherited_attribute(doc, page_id, b"Resources")? {
            Object::Dictionary(dict) => Some(dict.clone()),
            _ => None,
        }
    }

    /// Page width in points from the MediaBox.
    fn page_width_points(&self, doc: &Document, page_id: ObjectId) -> Option<f32> {
        let media_box = self.inherited_attribute(doc, page_id, b"MediaBox")?.as_array().ok()?;
        let coords: Vec<f32> = media_box.iter().filter_map(number).collect();
        match coords.as_slice() {
            [x0, _, x1, _] => Some((x1 - x0).abs()),
            _ => None,
        }
    }

    /// Scan every object for images; used when a page has no XObject images.
    fn extract_all_images(&self, doc: &Document) -> Vec<DynamicImage> {
        let images: Vec<DynamicImage> = doc
            .objects
            .values()
            .filter_map(|object| self.try_extract_image_from_object(doc, object))
            .collect();

        debug!("Found {} images in document", images.len());
        images
    }

    fn try_extract_image_from_object(&self, doc: &Document, obj: &Object) -> Option<DynamicImage> {
        let Object::Stream(stream) = obj else {
            return None;
        };
        let dict = &stream.dict;

        if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
            return None;
        }

        let width = u32::try_from(dict.get(b"Width").ok()?.as_i64().ok()?).ok()?;
        let height = u32::try_from(dict.get(b"Height").ok()?.as_i64().ok()?).ok()?;
        trace!("Found image object: {}x{}", width, height);

        if let Ok(filter) = dict.get(b"Filter") {
            let filter_name = match filter {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                _ => None,
            };

            match filter_name {
                Some(b"DCTDecode") => {
                    return image::load_from_memory_with_format(
                        &stream.content,
                        image::ImageFormat::Jpeg,
                    )
                    .ok();
                }
                Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
                    trace!("Skipping image with unsupported filter");
                    return None;
                }
                _ => {}
            }
        }

        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());

        let color_space = dict
            .get(b"ColorSpace")
            .ok()
            .and_then(|o| match o {
                Object::Name(name) => Some(name.as_slice()),
                Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
                Object::Reference(r) => doc.get_object(*r).ok().and_then(|o| o.as_name().ok()),
                _ => None,
            })
            .unwrap_or(b"DeviceRGB");

        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8);

        if bits != 8 {
            trace!("Unsupported bits per component: {}", bits);
            return None;
        }

        raw_to_image(&data, width, height, color_space)
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Build an RGBA image from uncompressed 8-bit RGB, gray or CMYK samples.
///
/// Dimensions whose sample count overflows `usize`, or that the data cannot
/// cover, yield `None`.
fn raw_to_image(data: &[u8], width: u32, height: u32, color_space: &[u8]) -> Option<DynamicImage> {
    let channels: usize = match color_space {
        b"DeviceRGB" | b"RGB" => 3,
        b"DeviceGray" | b"G" => 1,
        b"DeviceCMYK" | b"CMYK" => 4,
        _ => return None,
    };
    let pixels = usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?;
    let expected = pixels.checked_mul(channels)?;

    if data.len() < expected {
        trace!(
            "Could not decode image: data_len={}, expected={}",
            data.len(),
            expected
        );
        return None;
    }

    let mut rgba = Vec::with_capacity(pixels.checked_mul(4)?);
    for sample in data[..expected].chunks(channels) {
        match sample {
            [c, m, y, k] => rgba.extend_from_slice(&cmyk_to_rgba(*c, *m, *y, *k)),
            [r, g, b] => rgba.extend_from_slice(&[*r, *g, *b, 255]),
            [gray] => rgba.extend_from_slice(&[*gray, *gray, *gray, 255]),
            _ => return None,
        }
    }

    ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
}

/// Naive DeviceCMYK to RGB: each channel is `(255 - ink) * (255 - black) / 255`.
fn cmyk_to_rgba(c: u8, m: u8, y: u8, k: u8) -> [u8; 4] {
    let white = 255 - u16::from(k);
    let channel = |ink: u8| ((255 - u16::from(ink)) * white / 255) as u8;
    [channel(c), channel(m), channel(y), 255]
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = panic::catch_unwind(AssertUnwindSafe(|| Document::load_mem(data)))
            .map_err(|_| PdfError::Parse("lopdf panicked while parsing".to_string()))?
            .map_err(|e| PdfError::Parse(e.to_string()))?;

        // Receipts are often "protected" with an empty user password.
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_page_texts(&self, max_pages: usize) -> Result<Vec<String>> {
        self.document()?;

        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
        }));

        let pages = match extracted {
            Ok(Ok(pages)) => pages.into_iter().take(max_pages).collect::<Vec<_>>(),
            Ok(Err(e)) => {
                debug!("pdf-extract failed ({}), using lopdf text", e);
                return self.lopdf_page_texts(max_pages);
            }
            Err(_) => {
                warn!("pdf-extract panicked, using lopdf text");
                return self.lopdf_page_texts(max_pages);
            }
        };

        if pages.iter().all(|p| p.trim().is_empty()) {
            debug!("pdf-extract found no text, trying lopdf");
            return self.lopdf_page_texts(max_pages);
        }

        Ok(pages)
    }

    fn render_page(&self, page: u32, dpi: u32) -> Result<DynamicImage> {
        let doc = self.document()?;
        let page_id = *doc.get_pages().get(&page).ok_or(PdfError::InvalidPage(page))?;

        // Image-only receipts carry one full-page scan; take the largest image.
        let image = self
            .extract_images(page)?
            .into_iter()
            .max_by_key(|img| u64::from(img.width()) * u64::from(img.height()))
            .ok_or_else(|| PdfError::ImageExtraction("No images found in PDF".to_string()))?;

        let Some(width_pt) = self.page_width_points(doc, page_id) else {
            return Ok(image);
        };

        let target_width = (width_pt / POINTS_PER_INCH * dpi as f32).round() as u32;
        if target_width <= image.width() || image.width() == 0 {
            return Ok(image);
        }

        let scale = target_width as f32 / image.width() as f32;
        let target_height = (image.height() as f32 * scale).round() as u32;
        debug!(
            "Upscaling page {} image {}x{} -> {}x{} for {} dpi",
            page,
            image.width(),
            image.height(),
            target_width,
            target_height,
            dpi
        );
        Ok(image.resize(target_width, target_height, FilterType::CatmullRom))
    }

    fn extract_images(&self, page: u32) -> Result<Vec<DynamicImage>> {
        let doc = self.document()?;
        let pages = doc.get_pages();
        let page_id = pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let mut images = Vec::new();

        if let Some(resources) = self.page_resources(doc, *page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobj_dict))) = doc.dereference(xobjects) {
                    for (_name, obj_ref) in xobj_dict.iter() {
                        if let Ok((_, obj)) = doc.dereference(obj_ref) {
                            if let Some(img) = self.try_extract_image_from_object(doc, obj) {
                                images.push(img);
                            }
                        }
                    }
                }
            }
        }

        if images.is_empty() {
            debug!("No XObject images found on page {}, scanning all objects", page);
            images = self.extract_all_images(doc);
        }

        debug!("Extracted {} images from page {}", images.len(), page);
        Ok(images)
    }
}
