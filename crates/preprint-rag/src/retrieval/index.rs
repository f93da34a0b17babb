//! Exact in-memory vector index over document segments

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::{ScoredSegment, Segment};

/// How two embeddings are compared (lower distance is closer)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// `1 - cosine similarity`; zero-magnitude vectors are at distance 1
    #[default]
    Cosine,
    /// L2 distance
    Euclidean,
}

impl DistanceMetric {
    /// Distance between two vectors of equal length
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Cosine => {
                let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    return 1.0;
                }
                1.0 - dot / (norm_a * norm_b)
            }
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
        }
    }
}

#[derive(Debug, Clone)]
struct IndexEntry {
    segment: Segment,
    vector: Vec<f32>,
}

/// Brute-force nearest-neighbour index
///
/// Built once from a document's segments and immutable afterwards, so it can
/// be shared between requests behind an `Arc`. Dimensionality is fixed by
/// the first vector.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
    metric: DistanceMetric,
}

impl VectorIndex {
    /// Embed every segment and index it under the embedder's native metric
    pub async fn build(segments: Vec<Segment>, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        let texts: Vec<String> = segments.iter().map(|s| s.content.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await?;

        if vectors.len() != segments.len() {
            return Err(Error::embedding(format!(
                "{} returned {} embeddings for {} segments",
                embedder.name(),
                vectors.len(),
                segments.len()
            )));
        }

        let index = Self::from_embeddings(
            segments.into_iter().zip(vectors).collect(),
            embedder.distance_metric(),
        )?;

        tracing::debug!(
            "Indexed {} segments ({} dims, {:?}) with {}",
            index.len(),
            index.dimensions,
            index.metric,
            embedder.name()
        );

        Ok(index)
    }

    /// Index pre-computed embeddings
    pub fn from_embeddings(
        pairs: Vec<(Segment, Vec<f32>)>,
        metric: DistanceMetric,
    ) -> Result<Self> {
        let mut dimensions = 0usize;
        let mut entries = Vec::with_capacity(pairs.len());

        for (segment, vector) in pairs {
            if vector.is_empty() || (dimensions != 0 && vector.len() != dimensions) {
                return Err(Error::Consistency {
                    expected: dimensions,
                    actual: vector.len(),
                    at: format!("segment {}", segment.ordinal),
                });
            }
            dimensions = vector.len();
            entries.push(IndexEntry { segment, vector });
        }

        Ok(Self {
            entries,
            dimensions,
            metric,
        })
    }

    /// Number of indexed segments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector dimensionality (0 for an empty index)
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Indexed segments in build order
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.entries.iter().map(|e| &e.segment)
    }

    /// The `k` nearest segments to a query vector, nearest first.
    /// Equal distances are ordered by segment ordinal; undefined (NaN)
    /// distances rank after every real one.
    pub fn nearest(&self, query_vector: &[f32], k: usize) -> Result<Vec<ScoredSegment>> {
        if self.is_empty() {
            return Err(Error::EmptyIndex);
        }
        if query_vector.len() != self.dimensions {
            return Err(Error::Consistency {
                expected: self.dimensions,
                actual: query_vector.len(),
                at: "query".to_string(),
            });
        }

        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| {
                let distance = self.metric.distance(&entry.vector, query_vector);
                let distance = if distance.is_nan() {
                    f32::INFINITY
                } else {
                    distance
                };
                (distance, entry)
            })
            .collect();

        scored.sort_by(|(da, a), (db, b)| {
            da.total_cmp(db)
                .then_with(|| a.segment.ordinal.cmp(&b.segment.ordinal))
        });
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(distance, entry)| ScoredSegment {
                segment: entry.segment.clone(),
                distance,
            })
            .collect())
    }

    /// Embed `query` and return the `k` nearest segments with distances
    pub async fn search_with_scores(
        &self,
        query: &str,
        k: usize,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Vec<ScoredSegment>> {
        if self.is_empty() {
            return Err(Error::EmptyIndex);
        }
        let query_vector = embedder.embed(query).await?;
        self.nearest(&query_vector, k)
    }

    /// Embed `query` and return the `k` nearest segments, nearest first
    pub async fn search(
        &self,
        query: &str,
        k: usize,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<Vec<Segment>> {
        Ok(self
            .search_with_scores(query, k, embedder)
            .await?
            .into_iter()
            .map(|scored| scored.segment)
            .collect())
    }
}
