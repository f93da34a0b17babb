//! preprint-rag: question answering over preprint PDFs
//!
//! A PDF is downloaded once into a local cache, its text is split into
//! overlapping segments, and the segments are embedded into an in-memory
//! index. A question retrieves the nearest segments, which are stuffed into
//! a single prompt for the generative model. The answer is returned as-is.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::QaPipeline;
pub use retrieval::{DistanceMetric, VectorIndex};
pub use types::{Document, ScoredSegment, Segment};
