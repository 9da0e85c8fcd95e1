// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! External collaborators of the RAG pipeline
//!
//! The core consumes three provider traits:
//! - [`DocumentParser`]: binary document -> text
//! - [`EmbeddingProvider`]: texts -> fixed-dimension vectors
//! - [`GenerationProvider`]: prompt -> generated text
//!
//! Concrete implementations live in the submodules and are selected from
//! [`NodeConfig`](crate::config::NodeConfig) by the `build_*` functions.

pub mod document;
pub mod hashing;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod openai;
pub mod types;
pub mod watsonx;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{EmbeddingBackend, GenerationBackend, NodeConfig};

pub use document::{PdfParser, PlainTextParser, SniffingParser};
pub use hashing::HashingEmbedder;
pub use openai::{OpenAiChatGenerator, OpenAiEmbedder};
pub use types::{ParsedDocument, ProviderError};
pub use watsonx::{WatsonxConfig, WatsonxGenerator};

/// Trait for extracting text from uploaded documents
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Extract page texts from raw document bytes
    async fn parse(&self, bytes: &[u8]) -> Result<ParsedDocument, ProviderError>;

    /// Parser name for logging
    fn name(&self) -> &'static str;
}

/// Trait for embedding models
///
/// Implementations must return exactly one vector per input, in input
/// order. The adapter in [`crate::rag::embedder`] enforces this.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;

    /// Model identity; indexes record it so queries can be checked against it
    fn model_name(&self) -> &str;

    /// Fixed output dimension, when known up front
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// Trait for text generation models
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Document parser for uploads (PDF or UTF-8 text, chosen by content)
pub fn build_document_parser() -> Arc<dyn DocumentParser> {
    Arc::new(SniffingParser::new())
}

/// Embedding provider selected by `EMBEDDING_PROVIDER`
pub async fn build_embedding_provider(
    config: &NodeConfig,
) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
    let embedding = &config.embedding;
    match embedding.backend {
        EmbeddingBackend::Hashing => Ok(Arc::new(HashingEmbedder::new(embedding.dimension)?)),
        EmbeddingBackend::OpenAi => {
            let api_key = config
                .openai
                .api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required for openai embeddings"))?;
            Ok(Arc::new(OpenAiEmbedder::new(
                api_key,
                config.openai.base_url.clone(),
                embedding.model.clone(),
                Some(embedding.dimension),
                Duration::from_secs(config.timeouts.embed_secs),
            )?))
        }
        #[cfg(feature = "onnx")]
        EmbeddingBackend::Onnx => {
            let model_path = embedding
                .onnx_model_path
                .clone()
                .ok_or_else(|| anyhow::anyhow!("ONNX_MODEL_PATH is required for onnx embeddings"))?;
            let tokenizer_path = embedding.onnx_tokenizer_path.clone().ok_or_else(|| {
                anyhow::anyhow!("ONNX_TOKENIZER_PATH is required for onnx embeddings")
            })?;
            let model =
                onnx::OnnxEmbedder::new(embedding.model.clone(), model_path, tokenizer_path)
                    .await?;
            Ok(Arc::new(model))
        }
        #[cfg(not(feature = "onnx"))]
        EmbeddingBackend::Onnx => Err(anyhow::anyhow!(
            "EMBEDDING_PROVIDER=onnx requires building with --features onnx"
        )),
    }
}

/// Generation provider selected by `GENERATION_PROVIDER`
pub fn build_generation_provider(
    config: &NodeConfig,
) -> anyhow::Result<Arc<dyn GenerationProvider>> {
    let timeout = Duration::from_secs(config.timeouts.generate_secs);
    match config.generation.backend {
        GenerationBackend::Watsonx => Ok(Arc::new(WatsonxGenerator::new(
            config.watsonx.clone(),
            timeout,
        )?)),
        GenerationBackend::OpenAi => {
            let api_key = config
                .openai
                .api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required for openai generation"))?;
            Ok(Arc::new(OpenAiChatGenerator::new(
                api_key,
                config.openai.base_url.clone(),
                config.generation.model.clone(),
                timeout,
            )?))
        }
    }
}
