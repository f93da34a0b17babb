//! PDF text extraction

use crate::error::{Error, Result};

/// Replace ligatures and odd spacing that PDF fonts commonly produce
fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{00A0}', " ") // Non-breaking space -> space
        .replace('\u{FB01}', "fi") // fi ligature -> separate chars
        .replace('\u{FB02}', "fl") // fl ligature -> separate chars
        .replace('\u{FB00}', "ff") // ff ligature -> separate chars
        .replace('\u{FB03}', "ffi") // ffi ligature -> separate chars
        .replace('\u{FB04}', "ffl") // ffl ligature -> separate chars
}

/// Extracts text from PDF bytes, either the whole document or one page
pub struct PdfParser;

impl PdfParser {
    /// Extract text from a PDF
    ///
    /// `page` is 1-based. `None` extracts every page in order.
    pub fn extract_text(data: &[u8], page: Option<u32>) -> Result<String> {
        let text = match page {
            Some(page) => Self::extract_page(data, page)?,
            None => Self::extract_all(data)?,
        };
        Ok(cleanup_pdf_text(&text))
    }

    /// Number of pages in the PDF
    pub fn page_count(data: &[u8]) -> Result<u32> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::pdf(format!("Failed to load PDF: {}", e)))?;
        Ok(doc.get_pages().len() as u32)
    }

    fn extract_all(data: &[u8]) -> Result<String> {
        match pdf_extract::extract_text_from_mem(data) {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!("pdf-extract failed: {}, falling back to per-page extraction", e);
                Self::extract_all_fallback(data)
            }
        }
    }

    /// Page-by-page extraction through lopdf
    fn extract_all_fallback(data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::pdf(format!("Failed to load PDF: {}", e)))?;

        let mut text = String::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => tracing::debug!("Could not extract page {}: {}", page_number, e),
            }
        }
        Ok(text)
    }

    fn extract_page(data: &[u8], page: u32) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::pdf(format!("Failed to load PDF: {}", e)))?;

        let total = doc.get_pages().len() as u32;
        if page == 0 || page > total {
            return Err(Error::pdf(format!(
                "Page {} out of range (document has {} pages)",
                page, total
            )));
        }

        doc.extract_text(&[page])
            .map_err(|e| Error::pdf(format!("Failed to extract page {}: {}", page, e)))
    }
}
