// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Question answering over a built vector store
//!
//! Flow: validate -> registry lookup -> model check -> embed question ->
//! top-k retrieval -> grounding context -> prompt -> generation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, error, info};

use super::embedder::EmbedderAdapter;
use super::errors::{RagError, RagResult};
use super::prompt::{build_context, compose};
use super::registry::StoreRegistry;
use super::types::{Language, StoreStatus};
use crate::config::{DEFAULT_MAX_CONTEXT_CHARS, DEFAULT_TIMEOUT_SECS, DEFAULT_TOP_K};
use crate::providers::{GenerationProvider, ProviderError};

const GENERATOR_LABEL: &str = "generation provider";

/// Retrieval and generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct QaOptions {
    pub top_k: usize,
    pub max_context_chars: usize,
    pub generate_timeout: Duration,
}

impl Default for QaOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            generate_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// A chunk that grounded the answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub sequence_index: usize,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    /// Similarity-based proxy in [0, 1], not a calibrated probability
    pub confidence: f32,
    pub sources: Vec<SourceRef>,
    pub context_truncated: bool,
}

/// Map a cosine score in [-1, 1] linearly onto [0, 1]
pub fn confidence_from_score(score: f32) -> f32 {
    if !score.is_finite() {
        return 0.0;
    }
    ((score + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[derive(Clone)]
pub struct QaOrchestrator {
    registry: Arc<StoreRegistry>,
    embedder: EmbedderAdapter,
    generator: Arc<dyn GenerationProvider>,
    options: QaOptions,
}

impl QaOrchestrator {
    pub fn new(
        registry: Arc<StoreRegistry>,
        embedder: EmbedderAdapter,
        generator: Arc<dyn GenerationProvider>,
        options: QaOptions,
    ) -> Self {
        Self {
            registry,
            embedder,
            generator,
            options,
        }
    }

    /// Answer `question` from the store `store_id` in `language`
    pub async fn answer(&self, store_id: &str, question: &str, language: &str) -> RagResult<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagError::InvalidInput("question must not be empty".to_string()));
        }
        let language = Language::parse(language)
            .ok_or_else(|| RagError::UnsupportedLanguage(language.to_string()))?;

        let start = Instant::now();
        let store = self.registry.get(store_id).await.map_err(|e| match e {
            RagError::NotFound(id) => RagError::StoreNotFound(id),
            other => other,
        })?;

        let index = match (store.status, store.index) {
            (StoreStatus::Available, Some(index)) => index,
            (StoreStatus::Available, None) => {
                let err = RagError::InternalError(format!(
                    "store {} is available without an index",
                    store_id
                ));
                error!("Invariant violation: {}", err);
                return Err(err);
            }
            (status, _) => {
                return Err(RagError::StoreNotReady {
                    id: store_id.to_string(),
                    status,
                })
            }
        };

        if let Some(expected) = index.model() {
            let actual = self.embedder.model_name();
            if expected != actual {
                return Err(RagError::EmbeddingModelMismatch {
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }

        let query = self.embedder.embed_query(question).await?;
        let hits = index.query(&query, self.options.top_k)?;
        let top_score = match hits.first() {
            Some(best) => best.score,
            None => {
                let err = RagError::NoRelevantContent(store_id.to_string());
                error!("Invariant violation: {}", err);
                return Err(err);
            }
        };

        let context = build_context(&hits, self.options.max_context_chars);
        let prompt = compose(language, &context.text, question);
        debug!(
            store_id = %store_id,
            hits = hits.len(),
            chunks_used = context.chunks_used,
            context_truncated = context.truncated,
            "Grounding context assembled"
        );

        let generated = self.generate(&prompt).await?;

        let sources = hits
            .iter()
            .take(context.chunks_used)
            .map(|hit| SourceRef {
                sequence_index: hit.chunk.sequence_index,
                score: hit.score,
            })
            .collect();

        info!(
            store_id = %store_id,
            language = language.code(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Question answered"
        );

        Ok(Answer {
            answer: generated,
            confidence: confidence_from_score(top_score),
            sources,
            context_truncated: context.truncated,
        })
    }

    async fn generate(&self, prompt: &str) -> RagResult<String> {
        let timeout_ms = self.options.generate_timeout.as_millis() as u64;
        let text = timeout(self.options.generate_timeout, self.generator.generate(prompt))
            .await
            .map_err(|_| RagError::ProviderTimeout {
                provider: GENERATOR_LABEL.to_string(),
                timeout_ms,
            })?
            .map_err(|e| match e {
                ProviderError::Timeout { timeout_ms } => RagError::ProviderTimeout {
                    provider: GENERATOR_LABEL.to_string(),
                    timeout_ms,
                },
                other => RagError::GenerationProviderError(other.to_string()),
            })?;

        let text = text.trim();
        if text.is_empty() {
            return Err(RagError::GenerationProviderError(format!(
                "{} returned empty text",
                self.generator.name()
            )));
        }
        Ok(text.to_string())
    }
}
