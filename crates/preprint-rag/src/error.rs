//! Error types for the preprint QA service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the QA pipeline and its collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// Chunker was configured with impossible parameters
    #[error("Chunking error: {0}")]
    Chunking(String),

    /// Embedding dimensionality changed inside one index
    #[error("Embedding dimension mismatch at {at}: expected {expected}, got {actual}")]
    Consistency {
        expected: usize,
        actual: usize,
        /// Where the mismatch was found ("segment 3", "query")
        at: String,
    },

    /// Search on an index that holds no segments
    #[error("Knowledge base is empty; nothing to search")]
    EmptyIndex,

    /// Embedding provider failure
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Generative model failure
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// PDF could not be read or the requested page does not exist
    #[error("PDF error: {0}")]
    Pdf(String),

    /// PDF download failed
    #[error("Failed to download '{url}': {message}")]
    Download { url: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a chunking error
    pub fn chunking(message: impl Into<String>) -> Self {
        Self::Chunking(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create a PDF error
    pub fn pdf(message: impl Into<String>) -> Self {
        Self::Pdf(message.into())
    }

    /// Create a download error
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            Error::Chunking(_) => (StatusCode::BAD_REQUEST, "chunking_error"),
            Error::Consistency { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "consistency_error"),
            Error::EmptyIndex => (StatusCode::UNPROCESSABLE_ENTITY, "empty_index"),
            Error::Embedding(_) => (StatusCode::SERVICE_UNAVAILABLE, "embedding_error"),
            Error::Generation(_) => (StatusCode::SERVICE_UNAVAILABLE, "generation_error"),
            Error::Pdf(_) => (StatusCode::UNPROCESSABLE_ENTITY, "pdf_error"),
            Error::Download { .. } => (StatusCode::BAD_GATEWAY, "download_error"),
            Error::Config(_) => (StatusCode::BAD_REQUEST, "config_error"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
