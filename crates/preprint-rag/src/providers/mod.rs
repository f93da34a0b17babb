//! Provider abstractions for embeddings, LLM generation and PDF documents
//!
//! The pipeline only sees these traits, so the Ollama backends can be
//! swapped for the offline hashing embedder or for test doubles.

pub mod document_source;
pub mod embedding;
pub mod hashing;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod retry;

pub use document_source::DocumentSource;
pub use embedding::EmbeddingProvider;
pub use hashing::HashingEmbedder;
pub use llm::{Generation, LlmProvider, TokenUsage};
pub use local::LocalPdfCache;
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};
pub use retry::RetryPolicy;
