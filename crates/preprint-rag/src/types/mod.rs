//! Core types for the QA pipeline

pub mod document;
pub mod query;

pub use document::{Document, ScoredSegment, Segment};
pub use query::{AskQuery, ContentResponse, ExtractQuery, PdfQuery};
