//! Application state for the QA server

use std::sync::Arc;

use crate::config::{EmbeddingBackend, RagConfig};
use crate::error::Result;
use crate::pipeline::QaPipeline;
use crate::providers::{
    DocumentSource, EmbeddingProvider, HashingEmbedder, LlmProvider, LocalPdfCache, OllamaProvider,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// QA pipeline (knowledge base cache lives inside)
    pipeline: QaPipeline,
    /// Where PDFs come from
    documents: Arc<dyn DocumentSource>,
}

impl AppState {
    /// Create application state with the providers named in `config`
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!(
            "Initializing application state (embeddings: {:?})...",
            config.embeddings.backend
        );

        let (ollama_embedder, llm) =
            OllamaProvider::new(&config.llm, config.embeddings.dimensions)?.split();
        let llm: Arc<dyn LlmProvider> = Arc::new(llm);

        let embedder: Arc<dyn EmbeddingProvider> = match config.embeddings.backend {
            EmbeddingBackend::Ollama => {
                tracing::info!("Using Ollama embeddings ({})", config.llm.embed_model);
                Arc::new(ollama_embedder)
            }
            EmbeddingBackend::Hashing => {
                tracing::info!(
                    "Using offline hashing embeddings ({} dims)",
                    config.embeddings.dimensions
                );
                Arc::new(HashingEmbedder::new(config.embeddings.dimensions)?)
            }
        };

        let documents: Arc<dyn DocumentSource> = Arc::new(LocalPdfCache::new(&config.documents)?);
        tracing::info!("PDF cache at {}", config.documents.pdf_dir.display());

        let pipeline = QaPipeline::from_config(&config, embedder, llm)?;
        Ok(Self::with_components(config, pipeline, documents))
    }

    /// Assemble state from pre-built parts
    pub fn with_components(
        config: RagConfig,
        pipeline: QaPipeline,
        documents: Arc<dyn DocumentSource>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                documents,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the QA pipeline
    pub fn pipeline(&self) -> &QaPipeline {
        &self.inner.pipeline
    }

    /// Get the document source
    pub fn documents(&self) -> &Arc<dyn DocumentSource> {
        &self.inner.documents
    }
}
