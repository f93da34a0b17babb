//! HTTP routes for the QA server

pub mod ask;
pub mod documents;

use axum::{extract::State, routing::get, Json, Router};

use crate::retrieval::CacheStats;
use crate::server::state::AppState;

/// Build the question answering and document routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ask_corpus", get(ask::ask_corpus))
        .route("/extract_text", get(documents::extract_text))
        .route("/download_pdf", get(documents::download_pdf))
        .route("/cache/stats", get(cache_stats))
}

/// GET /cache/stats - Knowledge base cache statistics
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.pipeline().cache_stats())
}
