// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// In-memory vector index for a single document
// Built once from embedded chunks, then queried read-only by concurrent answers

use super::errors::{RagError, RagResult};
use super::types::{Chunk, EmbeddedChunk, ScoredChunk};

/// Entry stored in the index
#[derive(Clone, Debug)]
struct IndexEntry {
    chunk: Chunk,
    vector: Vec<f32>,
    norm: f64,
}

/// Exact nearest-neighbour index over chunk vectors
/// - Dimension fixed at construction
/// - Cosine similarity scoring, linear scan
/// - Deterministic ordering: score descending, then `sequence_index` ascending
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimension: usize,
    model: Option<String>,
}

impl VectorIndex {
    /// Build an index from a complete set of embedded chunks
    ///
    /// # Returns
    /// * `Err(EmptyIndex)` if `embedded` is empty
    /// * `Err(DimensionMismatch)` if vectors disagree on dimension
    pub fn build(embedded: Vec<EmbeddedChunk>) -> RagResult<Self> {
        let dimension = match embedded.first() {
            Some(first) => first.vector.len(),
            None => return Err(RagError::EmptyIndex),
        };
        if dimension == 0 {
            return Err(RagError::InternalError(
                "cannot index zero-dimensional vectors".to_string(),
            ));
        }

        let mut index = Self {
            entries: Vec::with_capacity(embedded.len()),
            dimension,
            model: None,
        };
        for item in embedded {
            index.insert(item)?;
        }
        Ok(index)
    }

    /// Record the embedding model the vectors came from
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add one embedded chunk
    pub fn insert(&mut self, item: EmbeddedChunk) -> RagResult<()> {
        if item.vector.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: item.vector.len(),
            });
        }
        let norm = magnitude(&item.vector);
        self.entries.push(IndexEntry {
            chunk: item.chunk,
            vector: item.vector,
            norm,
        });
        Ok(())
    }

    /// Search for the chunks most similar to `vector`
    ///
    /// # Arguments
    /// * `vector` - Query vector (must match the index dimension)
    /// * `top_k` - Number of results; clamped to the index size
    ///
    /// # Returns
    /// * `Ok(Vec<ScoredChunk>)` - highest score first
    /// * `Err` if the dimension differs or `top_k` is zero
    pub fn query(&self, vector: &[f32], top_k: usize) -> RagResult<Vec<ScoredChunk>> {
        if vector.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if top_k == 0 {
            return Err(RagError::InvalidInput(
                "top_k must be greater than 0".to_string(),
            ));
        }

        let query_norm = magnitude(vector);
        let mut results: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine(vector, query_norm, &entry.vector, entry.norm),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.chunk.sequence_index.cmp(&b.chunk.sequence_index))
        });
        results.truncate(top_k.min(self.entries.len()));

        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Stored chunks in insertion order
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|entry| &entry.chunk)
    }
}

// Accumulated in f64 so large finite components cannot overflow
fn magnitude(vector: &[f32]) -> f64 {
    vector
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity with precomputed norms; zero-norm vectors score 0
fn cosine(a: &[f32], norm_a: f64, b: &[f32], norm_b: f64) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 || !norm_a.is_finite() || !norm_b.is_finite() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();
    let score = (dot / norm_a / norm_b).clamp(-1.0, 1.0) as f32;
    if score.is_finite() {
        score
    } else {
        0.0
    }
}
