// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document ingestion: parse -> chunk -> embed -> index build
//!
//! The store record is created before any work starts so concurrent
//! lookups observe `Building`. Every stage races the store's cancellation
//! token; deletion of the store or abandonment of a synchronous ingest
//! cancels the build and the record ends `Failed` (or stays `Deleted`).

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::chunker::{split_with, ChunkConfig};
use super::embedder::EmbedderAdapter;
use super::errors::{RagError, RagResult};
use super::registry::StoreRegistry;
use super::types::StoreStatus;
use super::vector_index::VectorIndex;
use crate::providers::{DocumentParser, ProviderError};

const PARSER_LABEL: &str = "document parser";

#[derive(Clone)]
pub struct Ingestor {
    registry: Arc<StoreRegistry>,
    parser: Arc<dyn DocumentParser>,
    embedder: EmbedderAdapter,
    chunking: ChunkConfig,
    parse_timeout: Duration,
}

impl Ingestor {
    pub fn new(
        registry: Arc<StoreRegistry>,
        parser: Arc<dyn DocumentParser>,
        embedder: EmbedderAdapter,
        chunking: ChunkConfig,
        parse_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            parser,
            embedder,
            chunking,
            parse_timeout,
        }
    }

    /// Ingest a document and wait for the store to become available
    ///
    /// # Returns
    /// * `Ok(id)` once the store is `Available`
    /// * `Err` with the build failure; the record is left `Failed`
    ///
    /// Dropping the returned future cancels the build.
    pub async fn ingest(&self, bytes: Vec<u8>, source_name: Option<String>) -> RagResult<String> {
        let id = self.registry.create(source_name).await;
        let token = self.registry.build_token(&id).await?;
        let guard = token.clone().drop_guard();

        let handle = tokio::spawn(self.clone().run_build(id.clone(), bytes, token));
        let result = handle
            .await
            .map_err(|e| RagError::InternalError(format!("ingestion task failed: {}", e)))?;
        guard.disarm();

        result.map(|_| id)
    }

    /// Start ingestion in the background and return the id immediately
    pub async fn ingest_detached(&self, bytes: Vec<u8>, source_name: Option<String>) -> RagResult<String> {
        let id = self.registry.create(source_name).await;
        let token = self.registry.build_token(&id).await?;
        tokio::spawn(self.clone().run_build(id.clone(), bytes, token));
        Ok(id)
    }

    async fn run_build(self, id: String, bytes: Vec<u8>, token: CancellationToken) -> RagResult<()> {
        let start = Instant::now();
        info!(store_id = %id, bytes = bytes.len(), "Starting document ingestion");

        match self.build_index(&id, bytes, &token).await {
            Ok(index) => match self.registry.complete_build(&id, index).await {
                Ok(()) => {
                    info!(
                        store_id = %id,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Document ingestion complete"
                    );
                    Ok(())
                }
                Err(RagError::InvalidTransition {
                    from: StoreStatus::Deleted,
                    ..
                }) => Err(RagError::Cancelled(format!(
                    "store {} was deleted during its build",
                    id
                ))),
                Err(e) => Err(e),
            },
            Err(cause) => {
                match self.registry.mark_failed(&id, &cause).await {
                    Ok(()) => {}
                    Err(RagError::InvalidTransition {
                        from: StoreStatus::Deleted,
                        ..
                    }) => {
                        debug!(store_id = %id, "Build stopped for deleted store");
                    }
                    Err(e) => error!(store_id = %id, "Failed to record build failure: {}", e),
                }
                Err(cause)
            }
        }
    }

    async fn build_index(
        &self,
        id: &str,
        bytes: Vec<u8>,
        token: &CancellationToken,
    ) -> RagResult<VectorIndex> {
        let document = cancellable(token, id, async {
            timeout(self.parse_timeout, self.parser.parse(&bytes))
                .await
                .map_err(|_| RagError::ProviderTimeout {
                    provider: PARSER_LABEL.to_string(),
                    timeout_ms: self.parse_timeout.as_millis() as u64,
                })?
                .map_err(map_parse_error)
        })
        .await?;
        drop(bytes);

        let text = document.text();
        let chunks = split_with(&text, &self.chunking);
        if chunks.is_empty() {
            return Err(RagError::EmptyDocument);
        }
        debug!(
            store_id = %id,
            pages = document.page_count(),
            chunk_count = chunks.len(),
            "Document parsed and chunked"
        );

        let embedded = cancellable(token, id, self.embedder.embed_batch(chunks)).await?;

        let model = self.embedder.model_name().to_string();
        let index = cancellable(token, id, async move {
            tokio::task::spawn_blocking(move || {
                VectorIndex::build(embedded).map(|index| index.with_model(model))
            })
            .await
            .map_err(|e| RagError::InternalError(format!("index build task failed: {}", e)))?
        })
        .await?;

        Ok(index)
    }
}

/// Race a pipeline stage against the store's cancellation token
async fn cancellable<T, F>(token: &CancellationToken, id: &str, stage: F) -> RagResult<T>
where
    F: Future<Output = RagResult<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            warn!(store_id = %id, "Ingestion cancelled");
            Err(RagError::Cancelled(format!("ingestion of store {} was cancelled", id)))
        }
        result = stage => result,
    }
}

fn map_parse_error(err: ProviderError) -> RagError {
    match err {
        ProviderError::Timeout { timeout_ms } => RagError::ProviderTimeout {
            provider: PARSER_LABEL.to_string(),
            timeout_ms,
        },
        other => RagError::ParseError(other.to_string()),
    }
}
