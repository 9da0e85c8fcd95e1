// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding adapter: batches chunk text through an [`EmbeddingProvider`]
//!
//! The adapter never truncates, pads or retries. Any disagreement between
//! what was asked for and what came back is an error.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::errors::{RagError, RagResult};
use super::types::{Chunk, EmbeddedChunk};
use crate::providers::{EmbeddingProvider, ProviderError};

pub const DEFAULT_BATCH_SIZE: usize = 32;

const PROVIDER_LABEL: &str = "embedding provider";

#[derive(Clone)]
pub struct EmbedderAdapter {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    timeout: Duration,
}

impl EmbedderAdapter {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, batch_size: usize, timeout: Duration) -> Self {
        Self {
            provider,
            batch_size: batch_size.max(1),
            timeout,
        }
    }

    /// Model identity of the underlying provider
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Embed chunks in order, `batch_size` texts per provider call
    pub async fn embed_batch(&self, chunks: Vec<Chunk>) -> RagResult<Vec<EmbeddedChunk>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let mut dimension = self.provider.dimension();
        let mut embedded = Vec::with_capacity(chunks.len());
        let mut remaining = chunks.into_iter().peekable();

        while remaining.peek().is_some() {
            let batch: Vec<Chunk> = remaining.by_ref().take(self.batch_size).collect();
            let texts: Vec<String> = batch.iter().map(|chunk| chunk.text.clone()).collect();

            let vectors = self.call_provider(&texts).await?;
            for vector in &vectors {
                check_vector(vector, &mut dimension)?;
            }

            embedded.extend(
                batch
                    .into_iter()
                    .zip(vectors)
                    .map(|(chunk, vector)| EmbeddedChunk { chunk, vector }),
            );
        }

        debug!(
            chunk_count = embedded.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Embedded chunks with {}",
            self.model_name()
        );
        Ok(embedded)
    }

    /// Embed a single query string with the same provider and checks
    pub async fn embed_query(&self, text: &str) -> RagResult<Vec<f32>> {
        let mut vectors = self.call_provider(&[text.to_string()]).await?;
        let vector = vectors.pop().ok_or_else(|| {
            RagError::EmbeddingProviderError("provider returned no vector for query".to_string())
        })?;
        let mut dimension = self.provider.dimension();
        check_vector(&vector, &mut dimension)?;
        Ok(vector)
    }

    async fn call_provider(&self, texts: &[String]) -> RagResult<Vec<Vec<f32>>> {
        let vectors = tokio::time::timeout(self.timeout, self.provider.embed(texts))
            .await
            .map_err(|_| RagError::ProviderTimeout {
                provider: PROVIDER_LABEL.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            })?
            .map_err(map_provider_error)?;

        if vectors.len() != texts.len() {
            return Err(RagError::EmbeddingProviderError(format!(
                "provider returned {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }
}

/// Reject empty or non-finite vectors and any change of dimension
fn check_vector(vector: &[f32], dimension: &mut Option<usize>) -> RagResult<()> {
    if vector.is_empty() {
        return Err(RagError::EmbeddingProviderError(
            "provider returned an empty vector".to_string(),
        ));
    }
    if vector.iter().any(|value| !value.is_finite()) {
        return Err(RagError::EmbeddingProviderError(
            "provider returned non-finite values".to_string(),
        ));
    }
    match dimension {
        Some(expected) if *expected != vector.len() => {
            Err(RagError::EmbeddingProviderError(format!(
                "inconsistent embedding dimension: expected {}, got {}",
                expected,
                vector.len()
            )))
        }
        Some(_) => Ok(()),
        None => {
            *dimension = Some(vector.len());
            Ok(())
        }
    }
}

fn map_provider_error(err: ProviderError) -> RagError {
    match err {
        ProviderError::Timeout { timeout_ms } => RagError::ProviderTimeout {
            provider: PROVIDER_LABEL.to_string(),
            timeout_ms,
        },
        other => RagError::EmbeddingProviderError(other.to_string()),
    }
}
