//! Document and segment types

use serde::{Deserialize, Serialize};

/// Raw text extracted from a PDF
///
/// Immutable once extracted and owned by the request that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text
    pub text: String,
    /// 1-based page the text was taken from, `None` for the whole document
    pub page: Option<u32>,
    /// Identifier of the PDF the text came from (usually its URL)
    pub source: String,
}

impl Document {
    /// Create a document from extracted text
    pub fn new(text: impl Into<String>, page: Option<u32>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page,
            source: source.into(),
        }
    }

    /// Whether extraction produced any non-whitespace text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A bounded, contiguous slice of a document used for embedding and retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Position in the chunker's output (0-based)
    pub ordinal: usize,
    /// Text content
    pub content: String,
}

impl Segment {
    /// Create a new segment
    pub fn new(ordinal: usize, content: impl Into<String>) -> Self {
        Self {
            ordinal,
            content: content.into(),
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// A retrieved segment with its distance to the query (lower is closer)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSegment {
    /// The matched segment
    pub segment: Segment,
    /// Distance under the index's metric
    pub distance: f32,
}
