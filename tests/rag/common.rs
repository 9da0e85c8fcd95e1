// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Shared mock providers for RAG integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use docqa_node::config::NodeConfig;
use docqa_node::providers::{
    DocumentParser, EmbeddingProvider, GenerationProvider, ParsedDocument, PlainTextParser,
    ProviderError,
};
use docqa_node::rag::RagService;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const KEYWORDS: [&str; 3] = ["alpha", "beta", "gamma"];

/// Three 20-character segments, one keyword family each
pub fn three_chunk_document() -> String {
    format!(
        "{:<20}{:<20}{:<20}",
        "alpha alpha alpha", "beta beta beta", "gamma gamma"
    )
}

/// Embeds text as occurrence counts of alpha, beta and gamma
///
/// An optional gate holds every call until permits are added.
pub struct KeywordEmbedder {
    model: String,
    gate: Option<Arc<Semaphore>>,
}

impl KeywordEmbedder {
    pub fn new() -> Self {
        Self {
            model: "keyword-3".to_string(),
            gate: None,
        }
    }

    pub fn named(model: &str) -> Self {
        Self {
            model: model.to_string(),
            gate: None,
        }
    }

    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            model: "keyword-3".to_string(),
            gate: Some(gate),
        }
    }

    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        KEYWORDS
            .iter()
            .map(|keyword| {
                lower
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|word| word == keyword)
                    .count() as f32
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        }
        Ok(texts.iter().map(|text| Self::vector(text)).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> Option<usize> {
        Some(KEYWORDS.len())
    }
}

/// Returns a fixed answer and records every prompt it receives
pub struct RecordingGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationProvider for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Generator that never answers within any reasonable deadline
pub struct StalledGenerator;

#[async_trait]
impl GenerationProvider for StalledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

/// Generator that always fails with an API error
pub struct FailingGenerator;

#[async_trait]
impl GenerationProvider for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Api {
            status: 503,
            message: "model overloaded".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Plain-text parser that waits before returning
pub struct SlowParser {
    pub delay: Duration,
}

#[async_trait]
impl DocumentParser for SlowParser {
    async fn parse(&self, bytes: &[u8]) -> Result<ParsedDocument, ProviderError> {
        tokio::time::sleep(self.delay).await;
        PlainTextParser::new().parse(bytes).await
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

/// Node configuration sized for the 20-character test documents
pub fn test_config() -> NodeConfig {
    let mut config = NodeConfig::default();
    config.retrieval.chunk_size = 20;
    config.retrieval.chunk_overlap = 0;
    config.retrieval.top_k = 3;
    config.retrieval.max_context_chars = 4000;
    config.embedding.batch_size = 2;
    config.timeouts.parse_secs = 5;
    config.timeouts.embed_secs = 5;
    config.timeouts.generate_secs = 5;
    config
}

pub fn service_with(
    config: &NodeConfig,
    parser: Arc<dyn DocumentParser>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
) -> RagService {
    RagService::new(config, parser, embedder, generator).unwrap()
}

/// Service with plain-text parsing, keyword embeddings and the given generator
pub fn keyword_service(generator: Arc<dyn GenerationProvider>) -> RagService {
    service_with(
        &test_config(),
        Arc::new(PlainTextParser::new()),
        Arc::new(KeywordEmbedder::new()),
        generator,
    )
}

/// Poll until the store leaves `Building` or the deadline passes
pub async fn wait_until_settled(service: &RagService, id: &str) {
    use docqa_node::rag::StoreStatus;

    for _ in 0..200 {
        match service.store_info(id).await {
            Ok(store) if store.status == StoreStatus::Building => {}
            _ => return,
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("store {} still building after 2s", id);
}
