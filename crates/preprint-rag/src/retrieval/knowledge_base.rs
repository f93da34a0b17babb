//! Turning raw document text into a searchable knowledge base

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::ingestion::TextChunker;
use crate::providers::EmbeddingProvider;

use super::index::VectorIndex;

/// Chunks text and indexes every segment with one embedder
#[derive(Clone)]
pub struct KnowledgeBaseBuilder {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl KnowledgeBaseBuilder {
    pub fn new(chunker: TextChunker, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { chunker, embedder }
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Chunk `raw_text` and embed each segment.
    ///
    /// Text with no content yields an empty index; searching it fails with
    /// `Error::EmptyIndex`.
    pub async fn build_knowledge_base(&self, raw_text: &str) -> Result<VectorIndex> {
        let start = Instant::now();
        let segments = self.chunker.chunk(raw_text);
        let segment_count = segments.len();

        let index = VectorIndex::build(segments, self.embedder.as_ref()).await?;

        tracing::info!(
            segments = segment_count,
            dimensions = index.dimensions(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Built knowledge base from {} characters",
            raw_text.chars().count()
        );

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::providers::HashingEmbedder;

    fn builder() -> KnowledgeBaseBuilder {
        KnowledgeBaseBuilder::new(
            TextChunker::new(60, 10, "\n").unwrap(),
            Arc::new(HashingEmbedder::new(64).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_builds_one_entry_per_segment() {
        let text = "Line one about enzymes.\nLine two about kinetics.\nLine three about substrates.\nLine four about inhibitors.";
        let builder = builder();
        let expected = builder.chunker().chunk(text);

        let index = builder.build_knowledge_base(text).await.unwrap();

        assert_eq!(index.len(), expected.len());
        assert!(index.len() > 1);
        assert_eq!(index.dimensions(), 64);
        let indexed: Vec<_> = index.segments().cloned().collect();
        assert_eq!(indexed, expected);
    }

    #[tokio::test]
    async fn test_blank_text_gives_empty_index() {
        let index = builder().build_knowledge_base("\n\n  \n").await.unwrap();
        assert!(index.is_empty());

        let err = index
            .search("anything", 4, builder().embedder().as_ref())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyIndex));
    }
}
