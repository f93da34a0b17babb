//! Question answering endpoint

use axum::extract::{Query, State};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::AskQuery;

/// GET /ask_corpus - Answer a question about one PDF
///
/// Responds with the model's answer as plain text.
pub async fn ask_corpus(
    State(state): State<AppState>,
    Query(params): Query<AskQuery>,
) -> Result<String> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("ask_corpus", %request_id, pdf = %params.pdf);

    async move {
        let start = Instant::now();
        tracing::info!("Query: \"{}\"", params.query);

        let document = state.documents().load(&params.pdf, None).await?;
        let answer = state.pipeline().ask(&params.query, &document).await?;

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Answered from {} characters of text",
            document.text.chars().count()
        );
        Ok::<_, Error>(answer)
    }
    .instrument(span)
    .await
}
