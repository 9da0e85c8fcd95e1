// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for document ingestion, indexing and question answering
//!
//! Every failure carries a typed kind plus a human-readable message:
//! - Provider errors (parser, embedder, generator, timeouts)
//! - Index errors (dimension mismatch, empty index)
//! - Registry errors (unknown store, invalid lifecycle transition)
//! - Answer errors (store not ready, model mismatch, no grounding)

use thiserror::Error;

use super::types::StoreStatus;

/// Errors produced by the RAG pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RagError {
    /// Document parser could not extract text
    #[error("Failed to parse document: {0}")]
    ParseError(String),

    /// Document contained no extractable text
    #[error("Document contains no extractable text")]
    EmptyDocument,

    /// Embedding provider failed or returned an unusable result
    #[error("Embedding provider error: {0}")]
    EmbeddingProviderError(String),

    /// Vector dimension doesn't match the index dimension
    #[error("Dimension mismatch: expected {expected}D, got {actual}D")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Index construction was attempted with no chunks
    #[error("Cannot build an index from zero chunks")]
    EmptyIndex,

    /// Store lifecycle transition not allowed from its current state
    #[error("Invalid transition for store {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: StoreStatus,
        to: StoreStatus,
    },

    /// Registry lookup for an unknown or deleted identifier
    #[error("Store not found: {0}")]
    NotFound(String),

    /// Answer requested against an unknown or deleted store
    #[error("Vector store not found: {0}")]
    StoreNotFound(String),

    /// Store exists but cannot serve queries
    #[error("Store {id} is not ready (status: {status})")]
    StoreNotReady { id: String, status: StoreStatus },

    /// Query embedding model differs from the model the index was built with
    #[error("Embedding model mismatch: index built with {expected}, query uses {actual}")]
    EmbeddingModelMismatch { expected: String, actual: String },

    /// Index returned no chunks for an available store
    #[error("No relevant content found in store {0}")]
    NoRelevantContent(String),

    /// Text generation provider failed
    #[error("Generation provider error: {0}")]
    GenerationProviderError(String),

    /// External provider call exceeded its time bound
    #[error("{provider} timed out after {timeout_ms}ms")]
    ProviderTimeout { provider: String, timeout_ms: u64 },

    /// Caller-supplied input rejected before any work started
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No prompt template for the requested language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Operation abandoned by the caller or by store deletion
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Invariant violation inside the pipeline
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl RagError {
    /// Get error code for logging and API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            RagError::ParseError(_) => "PARSE_ERROR",
            RagError::EmptyDocument => "EMPTY_DOCUMENT",
            RagError::EmbeddingProviderError(_) => "EMBEDDING_PROVIDER_ERROR",
            RagError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            RagError::EmptyIndex => "EMPTY_INDEX",
            RagError::InvalidTransition { .. } => "INVALID_TRANSITION",
            RagError::NotFound(_) => "NOT_FOUND",
            RagError::StoreNotFound(_) => "STORE_NOT_FOUND",
            RagError::StoreNotReady { .. } => "STORE_NOT_READY",
            RagError::EmbeddingModelMismatch { .. } => "EMBEDDING_MODEL_MISMATCH",
            RagError::NoRelevantContent(_) => "NO_RELEVANT_CONTENT",
            RagError::GenerationProviderError(_) => "GENERATION_PROVIDER_ERROR",
            RagError::ProviderTimeout { .. } => "PROVIDER_TIMEOUT",
            RagError::InvalidInput(_) => "INVALID_INPUT",
            RagError::UnsupportedLanguage(_) => "UNSUPPORTED_LANGUAGE",
            RagError::Cancelled(_) => "CANCELLED",
            RagError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-friendly error message for API responses
    pub fn user_message(&self) -> String {
        match self {
            RagError::NotFound(_) | RagError::StoreNotFound(_) => {
                "Vector store not found".to_string()
            }
            RagError::StoreNotReady { status, .. } => match status {
                StoreStatus::Building => {
                    "Vector store is still being built, try again later".to_string()
                }
                StoreStatus::Failed => {
                    "Vector store failed to build and cannot answer questions".to_string()
                }
                other => format!("Vector store is not ready (status: {})", other),
            },
            RagError::EmptyDocument => {
                "The document does not contain any extractable text".to_string()
            }
            RagError::ProviderTimeout { provider, timeout_ms } => {
                format!("{} did not respond within {}s", provider, timeout_ms / 1000)
            }
            RagError::NoRelevantContent(_) | RagError::InternalError(_) => {
                "Internal error while answering the question".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Check if the caller may reasonably retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RagError::EmbeddingProviderError(_)
                | RagError::GenerationProviderError(_)
                | RagError::ProviderTimeout { .. }
                | RagError::StoreNotReady {
                    status: StoreStatus::Building,
                    ..
                }
        )
    }

    /// Check if this error indicates a bug rather than a bad input or provider
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            RagError::InvalidTransition { .. }
                | RagError::NoRelevantContent(_)
                | RagError::InternalError(_)
        )
    }
}

pub type RagResult<T> = Result<T, RagError>;
