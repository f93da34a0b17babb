//! Answer synthesis by stuffing retrieved segments into one generation call

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::providers::LlmProvider;
use crate::types::Segment;

use super::prompt::PromptBuilder;

/// Produces answers grounded in retrieved segments
///
/// All segments are passed verbatim, in retrieval order, in a single call.
/// The model's text is returned unchanged; token usage is only logged.
#[derive(Clone)]
pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerSynthesizer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Answer `query` from `segments`
    pub async fn answer(&self, query: &str, segments: &[Segment]) -> Result<String> {
        let context = PromptBuilder::build_context(segments);
        let start = Instant::now();

        let generation = self.llm.generate(&context, query).await?;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match generation.usage {
            Some(usage) => tracing::info!(
                provider = self.llm.name(),
                model = self.llm.model(),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total(),
                elapsed_ms,
                "Answer generated from {} segments",
                segments.len()
            ),
            None => tracing::info!(
                provider = self.llm.name(),
                model = self.llm.model(),
                elapsed_ms,
                "Answer generated from {} segments (no usage reported)",
                segments.len()
            ),
        }

        Ok(generation.text)
    }
}
