//! Local PDF cache: downloads PDFs into a directory and extracts their text

use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

use crate::config::DocumentConfig;
use crate::error::{Error, Result};
use crate::ingestion::PdfParser;
use crate::types::Document;

use super::document_source::DocumentSource;

/// Document source backed by a local directory of downloaded PDFs
pub struct LocalPdfCache {
    /// Directory to store PDFs
    pdf_dir: PathBuf,
    /// HTTP client for downloads
    client: Client,
}

impl LocalPdfCache {
    /// Create a new cache, creating the directory if needed
    pub fn new(config: &DocumentConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.pdf_dir)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.download_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            pdf_dir: config.pdf_dir.clone(),
            client,
        })
    }

    /// Local path for a PDF URL: the last path segment inside the cache directory
    pub fn local_path(&self, pdf_url: &str) -> Result<PathBuf> {
        let name = pdf_url
            .split(['?', '#'])
            .next()
            .and_then(|url| url.rsplit('/').next())
            .unwrap_or("");

        if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
            return Err(Error::download(pdf_url, "URL does not end in a file name"));
        }

        Ok(self.pdf_dir.join(name))
    }

    async fn download(&self, pdf_url: &str, path: &Path) -> Result<()> {
        tracing::info!("Downloading {}", pdf_url);

        let response = self
            .client
            .get(pdf_url)
            .send()
            .await
            .map_err(|e| Error::download(pdf_url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::download(
                pdf_url,
                format!("HTTP {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::download(pdf_url, e.to_string()))?;

        write_atomically(path, &bytes).await?;

        tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Write `bytes` to a uniquely named sibling of `path`, then rename it into place.
///
/// Concurrent downloads of one URL never share a partial file, and the
/// partial file is removed when either step fails.
async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let partial = path.with_extension(format!("{}.part", Uuid::new_v4().simple()));

    let written = match tokio::fs::write(&partial, bytes).await {
        Ok(()) => tokio::fs::rename(&partial, path).await,
        Err(e) => Err(e),
    };

    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
            tracing::debug!("Could not remove {}: {}", partial.display(), cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl DocumentSource for LocalPdfCache {
    async fn fetch(&self, pdf_url: &str) -> Result<PathBuf> {
        let path = self.local_path(pdf_url)?;

        if tokio::fs::try_exists(&path).await? {
            tracing::debug!("PDF cache hit: {}", path.display());
        } else {
            self.download(pdf_url, &path).await?;
        }

        Ok(path)
    }

    async fn extract_text(&self, path: &Path, page: Option<u32>) -> Result<Document> {
        let data = tokio::fs::read(path).await?;

        let text = tokio::task::spawn_blocking(move || PdfParser::extract_text(&data, page))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        tracing::debug!(
            "Extracted {} characters from {} (page: {:?})",
            text.chars().count(),
            path.display(),
            page
        );

        Ok(Document::new(text, page, path.to_string_lossy()))
    }

    fn name(&self) -> &str {
        "local-pdf-cache"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(dir: &Path) -> LocalPdfCache {
        LocalPdfCache::new(&DocumentConfig {
            pdf_dir: dir.to_path_buf(),
            download_timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_local_path_uses_last_segment() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());

        let path = cache
            .local_path("https://www.biorxiv.org/content/10.1101/2023.01.01.522000v1.full.pdf")
            .unwrap();
        assert_eq!(path, dir.path().join("2023.01.01.522000v1.full.pdf"));

        let path = cache.local_path("https://host/a/paper.pdf?download=true").unwrap();
        assert_eq!(path, dir.path().join("paper.pdf"));
    }

    #[test]
    fn test_local_path_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());

        assert!(matches!(
            cache.local_path("https://host/papers/"),
            Err(Error::Download { .. })
        ));
        assert!(cache.local_path("https://host/..").is_err());
    }

    #[tokio::test]
    async fn test_fetch_uses_cached_file_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());
        std::fs::write(dir.path().join("cached.pdf"), b"%PDF-1.4").unwrap();

        // Host is unresolvable; a cache hit must not touch it
        let path = cache.fetch("http://invalid.invalid/cached.pdf").await.unwrap();
        assert_eq!(path, dir.path().join("cached.pdf"));
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_concurrent_writes_leave_one_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.pdf");
        let first = vec![b'a'; 256 * 1024];
        let second = vec![b'b'; 128 * 1024];

        let (a, b) = tokio::join!(
            write_atomically(&path, &first),
            write_atomically(&path, &second)
        );
        a.unwrap();
        b.unwrap();

        let saved = std::fs::read(&path).unwrap();
        assert!(saved == first || saved == second);
        assert_eq!(dir_entries(dir.path()), vec!["paper.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_rename_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file
        let path = dir.path().join("paper.pdf");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), b"x").unwrap();

        let err = write_atomically(&path, b"%PDF-1.4").await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(dir_entries(dir.path()), vec!["paper.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache(dir.path());
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let err = cache.extract_text(&path, Some(1)).await.unwrap_err();
        assert!(matches!(err, Error::Pdf(_)));
    }
}
