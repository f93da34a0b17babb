//! Answer generation with an LLM over retrieved segments

pub mod ollama;
pub mod prompt;
pub mod synthesizer;

pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
pub use synthesizer::AnswerSynthesizer;
