//! Document source trait: PDF download and text extraction

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::Document;

/// Resolves PDF identifiers to local files and extracts their text
///
/// Implementations:
/// - `LocalPdfCache`: downloads into a local directory on first use
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Make the PDF available locally, downloading it if needed.
    /// Returns the local path.
    async fn fetch(&self, pdf_url: &str) -> Result<PathBuf>;

    /// Extract text from a local PDF; `page` is 1-based, `None` means every page
    async fn extract_text(&self, path: &Path, page: Option<u32>) -> Result<Document>;

    /// Fetch and extract in one step
    async fn load(&self, pdf_url: &str, page: Option<u32>) -> Result<Document> {
        let path = self.fetch(pdf_url).await?;
        let mut document = self.extract_text(&path, page).await?;
        document.source = pdf_url.to_string();
        Ok(document)
    }

    /// Get source name for logging
    fn name(&self) -> &str;
}
