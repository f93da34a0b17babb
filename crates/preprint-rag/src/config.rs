//! Configuration for the preprint QA service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "PREPRINT_RAG_CONFIG";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Knowledge base cache configuration
    pub cache: CacheConfig,
    /// PDF download/cache configuration
    pub documents: DocumentConfig,
}

impl RagConfig {
    /// Parse a config from TOML text. Missing sections fall back to defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Load a config file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load configuration from `.env`, the optional config file and env overrides
    pub fn load() -> Result<Self> {
        // A missing .env file is normal
        let _ = dotenvy::dotenv();

        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `PREPRINT_RAG_HOST`, `PREPRINT_RAG_PORT` and `OLLAMA_BASE_URL`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("PREPRINT_RAG_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PREPRINT_RAG_PORT") {
            self.server.port = port.parse().map_err(|e| {
                Error::Config(format!("Invalid PREPRINT_RAG_PORT '{}': {}", port, e))
            })?;
        }
        if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
            self.llm.base_url = url;
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5003,
            enable_cors: true,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
    /// Separator the text is split on before packing
    pub separator: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separator: "\n".to_string(),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Segments passed to the answer synthesizer
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Ollama embeddings endpoint
    #[default]
    Ollama,
    /// Offline feature-hashing embedder
    Hashing,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Backend selection
    pub backend: EmbeddingBackend,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Ollama,
            dimensions: 768,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each attempt
    pub retry_base_delay_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.0,
            timeout_secs: 120,
            max_retries: 2,
            retry_base_delay_ms: 500,
        }
    }
}

/// Knowledge base cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of built indexes kept in memory (0 disables caching)
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 32 }
    }
}

/// PDF download/cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Directory downloaded PDFs are kept in
    pub pdf_dir: PathBuf,
    /// Download timeout in seconds
    pub download_timeout_secs: u64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            pdf_dir: PathBuf::from("./pdfs"),
            download_timeout_secs: 60,
        }
    }
}
