//! Question answering over a single document
//!
//! `QaPipeline` owns every collaborator a question needs: the chunker and
//! embedder that build knowledge bases, the cache that keeps them, and the
//! synthesizer that writes the answer.

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::AnswerSynthesizer;
use crate::ingestion::TextChunker;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::{CacheStats, KnowledgeBaseBuilder, KnowledgeBaseCache, VectorIndex};
use crate::types::{Document, ScoredSegment};

/// Retrieval-augmented QA pipeline
pub struct QaPipeline {
    builder: KnowledgeBaseBuilder,
    synthesizer: AnswerSynthesizer,
    cache: KnowledgeBaseCache,
    top_k: usize,
}

impl QaPipeline {
    pub fn new(
        chunker: TextChunker,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        cache: KnowledgeBaseCache,
        top_k: usize,
    ) -> Self {
        Self {
            builder: KnowledgeBaseBuilder::new(chunker, embedder),
            synthesizer: AnswerSynthesizer::new(llm),
            cache,
            top_k,
        }
    }

    /// Create a pipeline from configuration and ready-made providers
    pub fn from_config(
        config: &RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        Ok(Self::new(
            TextChunker::from_config(&config.chunking)?,
            embedder,
            llm,
            KnowledgeBaseCache::new(config.cache.max_entries),
            config.retrieval.top_k,
        ))
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        self.builder.embedder()
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        self.synthesizer.llm()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Knowledge base for `text`, reusing a cached index when one exists
    pub async fn knowledge_base(&self, text: &str) -> Result<Arc<VectorIndex>> {
        let key = KnowledgeBaseCache::content_key(text);
        if let Some(index) = self.cache.get(&key) {
            return Ok(index);
        }

        // Concurrent misses on one document may both build; the last insert wins
        let index = Arc::new(self.builder.build_knowledge_base(text).await?);
        self.cache.insert(key, Arc::clone(&index));
        Ok(index)
    }

    /// Retrieve the segments most relevant to `query`, with distances
    pub async fn retrieve(&self, query: &str, document: &Document) -> Result<Vec<ScoredSegment>> {
        if document.is_blank() {
            tracing::warn!(source = %document.source, "No text extracted; nothing to index");
            return Err(Error::EmptyIndex);
        }

        let index = self.knowledge_base(&document.text).await?;
        index
            .search_with_scores(query, self.top_k, self.builder.embedder().as_ref())
            .await
    }

    /// Answer `query` using only the content of `document`
    pub async fn ask(&self, query: &str, document: &Document) -> Result<String> {
        let scored = self.retrieve(query, document).await?;

        tracing::debug!(
            source = %document.source,
            "Retrieved segments {:?} (best distance: {:?})",
            scored.iter().map(|s| s.segment.ordinal).collect::<Vec<_>>(),
            scored.first().map(|s| s.distance)
        );

        let segments: Vec<_> = scored.into_iter().map(|s| s.segment).collect();
        self.synthesizer.answer(query, &segments).await
    }
}
