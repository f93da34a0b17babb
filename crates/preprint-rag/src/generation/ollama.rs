//! Ollama API client for embeddings and answer generation with retry logic

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::providers::llm::{Generation, TokenUsage};
use crate::providers::retry::{Attempt, RetryPolicy};

use super::prompt::PromptBuilder;

/// Ollama API client with automatic retry
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
    /// Retry policy for every request
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new Ollama client with retry support
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retry: RetryPolicy::from_config(config),
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding using Ollama with retry
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.config.base_url);

        self.retry
            .run("Embedding request", || async {
                let request = EmbedRequest {
                    model: self.config.embed_model.clone(),
                    prompt: text.to_string(),
                };

                let response = self
                    .client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| {
                        Attempt::Transient(Error::embedding(format!(
                            "Embedding request failed: {}",
                            e
                        )))
                    })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(Attempt::from_status(
                        status,
                        Error::embedding(format!("Embedding failed: HTTP {}", status)),
                    ));
                }

                let embed_response: EmbedResponse = response.json().await.map_err(|e| {
                    Attempt::Permanent(Error::embedding(format!(
                        "Failed to parse embedding response: {}",
                        e
                    )))
                })?;

                Ok(embed_response.embedding)
            })
            .await
    }

    /// Answer a question from a stuffed context, with retry
    pub async fn generate(&self, context: &str, question: &str) -> Result<Generation> {
        let url = format!("{}/api/generate", self.config.base_url);
        let prompt = PromptBuilder::build_qa_prompt(question, context);

        tracing::debug!(
            "Generating answer with model {} ({} prompt chars)",
            self.config.generate_model,
            prompt.chars().count()
        );

        self.retry
            .run("Generation request", || async {
                let request = GenerateRequest {
                    model: self.config.generate_model.clone(),
                    prompt: prompt.clone(),
                    stream: false,
                    options: GenerateOptions {
                        temperature: self.config.temperature,
                    },
                };

                let response = self
                    .client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| {
                        Attempt::Transient(Error::generation(format!(
                            "Generation request failed: {}",
                            e
                        )))
                    })?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(Attempt::from_status(
                        status,
                        Error::generation(format!("Generation failed: HTTP {} - {}", status, body)),
                    ));
                }

                let generate_response: GenerateResponse = response.json().await.map_err(|e| {
                    Attempt::Permanent(Error::generation(format!(
                        "Failed to parse generation response: {}",
                        e
                    )))
                })?;

                Ok(into_generation(generate_response))
            })
            .await
    }
}

fn into_generation(response: GenerateResponse) -> Generation {
    let generation = Generation::new(response.response);
    match (response.prompt_eval_count, response.eval_count) {
        (None, None) => generation,
        (prompt, completion) => generation.with_usage(TokenUsage {
            prompt_tokens: prompt.unwrap_or(0),
            completion_tokens: completion.unwrap_or(0),
        }),
    }
}
