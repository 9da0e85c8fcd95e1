// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Protocol-agnostic facade over ingestion, the registry and QA

use std::collections::BTreeMap;
use std::sync::Arc;

use super::chunker::ChunkConfig;
use super::embedder::EmbedderAdapter;
use super::errors::RagResult;
use super::ingest::Ingestor;
use super::qa::{Answer, QaOptions, QaOrchestrator};
use super::registry::{Store, StoreRegistry, StoreSummary};
use crate::config::NodeConfig;
use crate::providers::{DocumentParser, EmbeddingProvider, GenerationProvider};

#[derive(Clone)]
pub struct RagService {
    registry: Arc<StoreRegistry>,
    ingestor: Ingestor,
    qa: QaOrchestrator,
}

impl RagService {
    /// Wire the pipeline from configuration and provider trait objects
    pub fn new(
        config: &NodeConfig,
        parser: Arc<dyn DocumentParser>,
        embedding: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
    ) -> RagResult<Self> {
        Self::with_registry(
            Arc::new(StoreRegistry::new()),
            config,
            parser,
            embedding,
            generator,
        )
    }

    /// Same as [`RagService::new`] with an existing registry
    pub fn with_registry(
        registry: Arc<StoreRegistry>,
        config: &NodeConfig,
        parser: Arc<dyn DocumentParser>,
        embedding: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
    ) -> RagResult<Self> {
        let chunking = ChunkConfig::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap)?;
        let embedder = EmbedderAdapter::new(
            embedding,
            config.embedding.batch_size,
            config.timeouts.embed(),
        );

        let ingestor = Ingestor::new(
            registry.clone(),
            parser,
            embedder.clone(),
            chunking,
            config.timeouts.parse(),
        );
        let qa = QaOrchestrator::new(
            registry.clone(),
            embedder,
            generator,
            QaOptions {
                top_k: config.retrieval.top_k,
                max_context_chars: config.retrieval.max_context_chars,
                generate_timeout: config.timeouts.generate(),
            },
        );

        Ok(Self {
            registry,
            ingestor,
            qa,
        })
    }

    pub async fn ingest(&self, bytes: Vec<u8>, source_name: Option<String>) -> RagResult<String> {
        self.ingestor.ingest(bytes, source_name).await
    }

    pub async fn ingest_detached(
        &self,
        bytes: Vec<u8>,
        source_name: Option<String>,
    ) -> RagResult<String> {
        self.ingestor.ingest_detached(bytes, source_name).await
    }

    pub async fn store_info(&self, id: &str) -> RagResult<Store> {
        self.registry.get(id).await
    }

    pub async fn list_stores(&self) -> BTreeMap<String, StoreSummary> {
        self.registry.list().await
    }

    pub async fn delete_store(&self, id: &str) -> RagResult<()> {
        self.registry.delete(id).await
    }

    pub async fn answer(&self, store_id: &str, question: &str, language: &str) -> RagResult<Answer> {
        self.qa.answer(store_id, question, language).await
    }

    pub fn registry(&self) -> &Arc<StoreRegistry> {
        &self.registry
    }
}
