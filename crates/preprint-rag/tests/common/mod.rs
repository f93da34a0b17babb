//! Test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use preprint_rag::config::RagConfig;
use preprint_rag::error::{Error, Result};
use preprint_rag::generation::PromptBuilder;
use preprint_rag::ingestion::TextChunker;
use preprint_rag::providers::{
    DocumentSource, EmbeddingProvider, Generation, HashingEmbedder, LlmProvider, TokenUsage,
};
use preprint_rag::retrieval::KnowledgeBaseCache;
use preprint_rag::types::Document;
use preprint_rag::QaPipeline;

pub const PHOTOSYNTHESIS: &str = "Photosynthesis is the process by which green plants convert light energy into chemical energy.\nChlorophyll is the green pigment that absorbs light, mostly in the blue and red wavelengths.\nThe light reactions take place in the thylakoid membranes of the chloroplast.\nThe Calvin cycle fixes carbon dioxide into sugars in the stroma.";

/// Answers with the first stuffed segment, so answers are traceable to retrieval
pub struct ExtractiveLlm {
    calls: AtomicUsize,
    questions: Mutex<Vec<String>>,
}

impl ExtractiveLlm {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for ExtractiveLlm {
    async fn generate(&self, context: &str, question: &str) -> Result<Generation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.questions.lock().push(question.to_string());

        let prompt = PromptBuilder::build_qa_prompt(question, context);
        let first = context
            .split(preprint_rag::generation::prompt::DOCUMENT_SEPARATOR)
            .next()
            .unwrap_or("");

        Ok(Generation::new(first).with_usage(TokenUsage {
            prompt_tokens: prompt.split_whitespace().count() as u32,
            completion_tokens: first.split_whitespace().count() as u32,
        }))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "extractive"
    }

    fn model(&self) -> &str {
        "first-segment"
    }
}

/// Hashing embedder that counts every text it embeds
pub struct CountingEmbedder {
    inner: HashingEmbedder,
    calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            inner: HashingEmbedder::new(dimensions).unwrap(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Returns one extra dimension for any text containing `marker`
pub struct InconsistentEmbedder {
    pub marker: &'static str,
}

#[async_trait]
impl EmbeddingProvider for InconsistentEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.contains(self.marker) {
            Ok(vec![1.0; 5])
        } else {
            Ok(vec![1.0; 4])
        }
    }

    fn dimensions(&self) -> usize {
        4
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "inconsistent"
    }
}

/// Document source serving fixed texts keyed by URL
pub struct StaticSource {
    texts: HashMap<String, String>,
}

impl StaticSource {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            texts: entries
                .iter()
                .map(|(url, text)| (url.to_string(), text.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl DocumentSource for StaticSource {
    async fn fetch(&self, pdf_url: &str) -> Result<PathBuf> {
        if self.texts.contains_key(pdf_url) {
            Ok(PathBuf::from(pdf_url))
        } else {
            Err(Error::download(pdf_url, "HTTP 404 Not Found"))
        }
    }

    async fn extract_text(&self, path: &Path, page: Option<u32>) -> Result<Document> {
        let key = path.to_string_lossy().to_string();
        let text = self
            .texts
            .get(&key)
            .ok_or_else(|| Error::pdf(format!("no such file {}", key)))?;

        let text = match page {
            None => text.clone(),
            Some(page) => text
                .lines()
                .nth(page.saturating_sub(1) as usize)
                .ok_or_else(|| Error::pdf(format!("page {} out of range", page)))?
                .to_string(),
        };
        Ok(Document::new(text, page, key))
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Pipeline with one segment per line of `PHOTOSYNTHESIS`-sized text
pub fn line_pipeline(
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    cache_entries: usize,
) -> QaPipeline {
    QaPipeline::new(
        TextChunker::new(100, 0, "\n").unwrap(),
        embedder,
        llm,
        KnowledgeBaseCache::new(cache_entries),
        1,
    )
}

/// Pipeline with the default configuration
pub fn default_pipeline(
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
) -> QaPipeline {
    QaPipeline::from_config(&RagConfig::default(), embedder, llm).unwrap()
}
