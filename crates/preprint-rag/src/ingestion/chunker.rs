//! Separator-based text chunking with character overlap

use std::collections::VecDeque;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::Segment;

/// Splits text on a separator and greedily packs the pieces into bounded chunks
///
/// Lengths are measured in characters. When a chunk is emitted, pieces are
/// dropped from the front of the window until at most `overlap` characters
/// remain, and those carry over into the next chunk.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Characters carried over between consecutive chunks
    overlap: usize,
    /// Split boundary
    separator: String,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize, separator: impl Into<String>) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::chunking("chunk_size must be greater than zero"));
        }
        if overlap > chunk_size {
            return Err(Error::chunking(format!(
                "overlap ({}) is larger than chunk_size ({})",
                overlap, chunk_size
            )));
        }

        Ok(Self {
            chunk_size,
            overlap,
            separator: separator.into(),
        })
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap, config.separator.clone())
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk text into ordered segments. Empty input yields no segments.
    pub fn chunk(&self, text: &str) -> Vec<Segment> {
        let pieces = self.split(text);
        self.merge(&pieces)
            .into_iter()
            .enumerate()
            .map(|(ordinal, content)| Segment::new(ordinal, content))
            .collect()
    }

    /// Split on the separator, dropping empty pieces
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if self.separator.is_empty() {
            return text
                .char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect();
        }

        text.split(self.separator.as_str())
            .filter(|piece| !piece.is_empty())
            .collect()
    }

    /// Pack pieces into chunks no longer than `chunk_size`
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let sep_len = self.separator.chars().count();
        let mut chunks = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = piece.chars().count();
            let joiner = if window.is_empty() { 0 } else { sep_len };

            if total + len + joiner > self.chunk_size && !window.is_empty() {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }

                if let Some(chunk) = self.join(&window) {
                    chunks.push(chunk);
                }

                // Keep only the tail that fits in the overlap and leaves room for `piece`
                while total > self.overlap
                    || (total > 0 && total + len + self.joiner_len(&window) > self.chunk_size)
                {
                    let dropped_joiner = if window.len() > 1 { sep_len } else { 0 };
                    match window.pop_front() {
                        Some((_, first_len)) => {
                            total = total.saturating_sub(first_len + dropped_joiner);
                        }
                        None => break,
                    }
                }
            }

            window.push_back((piece, len));
            total += len + if window.len() > 1 { sep_len } else { 0 };
        }

        if total > self.chunk_size {
            tracing::warn!(
                "Created a chunk of size {}, which is longer than the specified {}",
                total,
                self.chunk_size
            );
        }
        if let Some(chunk) = self.join(&window) {
            chunks.push(chunk);
        }

        chunks
    }

    fn joiner_len(&self, window: &VecDeque<(&str, usize)>) -> usize {
        if window.is_empty() {
            0
        } else {
            self.separator.chars().count()
        }
    }

    /// Join a window with the separator; whitespace-only chunks are skipped
    fn join(&self, window: &VecDeque<(&str, usize)>) -> Option<String> {
        let joined = window
            .iter()
            .map(|(piece, _)| *piece)
            .collect::<Vec<_>>()
            .join(&self.separator);
        let trimmed = joined.trim();

        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
            separator: "\n".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.content.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let chunker = TextChunker::default();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk("\n\n\n").is_empty());
    }

    #[test]
    fn test_short_text_is_single_segment() {
        let text = "Photosynthesis converts light into chemical energy.\nChlorophyll absorbs light.";
        let segments = TextChunker::default().chunk(text);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].content, text);
        assert_eq!(segments[0].ordinal, 0);
    }

    #[test]
    fn test_packing_with_overlap() {
        let chunker = TextChunker::new(7, 3, " ").unwrap();
        let segments = chunker.chunk("foo bar baz 123");

        assert_eq!(contents(&segments), vec!["foo bar", "bar baz", "baz 123"]);
        assert_eq!(
            segments.iter().map(|s| s.ordinal).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_oversized_piece_is_emitted_alone() {
        let chunker = TextChunker::new(10, 2, "\n").unwrap();
        let long = "abcdefghijklmnopqrstuvwxyz";
        let segments = chunker.chunk(&format!("ab\n{}\ncd", long));

        assert_eq!(contents(&segments), vec!["ab", long, "cd"]);
    }

    #[test]
    fn test_no_overlap() {
        let chunker = TextChunker::new(5, 0, "\n").unwrap();
        let segments = chunker.chunk("aa\nbb\ncc\ndd");

        assert_eq!(contents(&segments), vec!["aa\nbb", "cc\ndd"]);
    }

    #[test]
    fn test_lengths_are_characters_not_bytes() {
        // Each piece is 3 chars but 6 bytes
        let chunker = TextChunker::new(7, 0, "\n").unwrap();
        let segments = chunker.chunk("äöü\néèê\nñõã");

        assert_eq!(contents(&segments), vec!["äöü\néèê", "ñõã"]);
    }

    #[test]
    fn test_empty_separator_splits_characters() {
        let chunker = TextChunker::new(3, 1, "").unwrap();
        let segments = chunker.chunk("abcde");

        assert_eq!(contents(&segments), vec!["abc", "cde"]);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(matches!(
            TextChunker::new(0, 0, "\n"),
            Err(Error::Chunking(_))
        ));
        assert!(matches!(
            TextChunker::new(100, 200, "\n"),
            Err(Error::Chunking(_))
        ));
    }
}
