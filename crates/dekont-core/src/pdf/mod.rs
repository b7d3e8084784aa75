//! Receipt PDF reading: per-page text layer and the page-1 scan image.

mod extractor;

pub use extractor::PdfExtractor;

use image::DynamicImage;

use crate::error::PdfError;

pub type Result<T> = std::result::Result<T, PdfError>;

/// Backend that reads a receipt PDF. Pages are numbered from 1.
pub trait PdfProcessor {
    /// Parse `data`, decrypting receipts protected with an empty password.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    fn page_count(&self) -> u32;

    /// Text layer of the first `max_pages` pages, one string per page.
    fn extract_page_texts(&self, max_pages: usize) -> Result<Vec<String>>;

    /// Page image for OCR, sized for `dpi` against the page MediaBox.
    fn render_page(&self, page: u32, dpi: u32) -> Result<DynamicImage>;

    /// Raster images embedded in a page.
    fn extract_images(&self, page: u32) -> Result<Vec<DynamicImage>>;
}
