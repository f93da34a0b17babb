//! PDF download and text extraction endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{ContentResponse, ExtractQuery, PdfQuery};

/// GET /download_pdf - Make a PDF available locally
pub async fn download_pdf(
    State(state): State<AppState>,
    Query(params): Query<PdfQuery>,
) -> Result<Json<ContentResponse>> {
    let path = state.documents().fetch(&params.pdf).await?;
    tracing::info!("PDF ready at {}", path.display());

    Ok(Json(ContentResponse::new("success")))
}

/// GET /extract_text - Text of one page (1-based, default 1)
pub async fn extract_text(
    State(state): State<AppState>,
    Query(params): Query<ExtractQuery>,
) -> Result<Json<ContentResponse>> {
    let document = state.documents().load(&params.pdf, Some(params.page)).await?;

    Ok(Json(ContentResponse::new(document.text)))
}
