//! Preprint QA server binary
//!
//! Run with: cargo run -p preprint-rag --bin preprint-rag-server

use preprint_rag::{
    config::{EmbeddingBackend, RagConfig},
    generation::OllamaClient,
    server::PreprintServer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "preprint_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RagConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embeddings: {:?}", config.embeddings.backend);
    if config.embeddings.backend == EmbeddingBackend::Ollama {
        tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    }
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Top k: {}", config.retrieval.top_k);

    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    match OllamaClient::new(&config.llm)?.health_check().await {
        Ok(true) => tracing::info!("Ollama is running"),
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Start it with `ollama serve`, then pull the models:");
            tracing::warn!(
                "  ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
        }
    }

    let server = PreprintServer::new(config)?;

    tracing::info!("Health: http://{}/health", server.address());
    tracing::info!("Ask:    GET http://{}/ask_corpus?query=...&pdf=...", server.address());

    server.start().await?;

    Ok(())
}
