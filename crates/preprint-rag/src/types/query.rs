//! Request parameter types for the HTTP boundary

use serde::{Deserialize, Serialize};

/// Query string of `GET /ask_corpus`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskQuery {
    /// Natural-language question
    pub query: String,
    /// PDF URL the question is about
    pub pdf: String,
}

/// Query string of `GET /extract_text`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractQuery {
    /// PDF URL
    pub pdf: String,
    /// 1-based page number (default: 1)
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Query string of `GET /download_pdf`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfQuery {
    /// PDF URL
    pub pdf: String,
}

/// JSON body returned by the document endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResponse {
    pub content: String,
}

impl ContentResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
