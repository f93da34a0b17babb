//! LLM provider trait for generating answers

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// Token accounting reported by the model, when available
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Text produced by a generative model
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Model output
    pub text: String,
    /// Usage metadata, if the backend reports it
    pub usage: Option<TokenUsage>,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Trait for LLM-based answer generation
///
/// Implementations:
/// - `OllamaLlm`: Local Ollama server (llama3.2, phi3, etc.)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Answer `question` using only `context`
    async fn generate(&self, context: &str, question: &str) -> Result<Generation>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
