//! Knowledge base construction, similarity search and index caching

mod cache;
mod index;
mod knowledge_base;

pub use cache::{CacheStats, KnowledgeBaseCache};
pub use index::{DistanceMetric, VectorIndex};
pub use knowledge_base::KnowledgeBaseBuilder;
