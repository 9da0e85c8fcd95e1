// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// RAG (Retrieval-Augmented Generation) module
// Document ingestion, per-document vector stores and grounded question answering

pub mod chunker;
pub mod embedder;
pub mod errors;
pub mod eviction;
pub mod ingest;
pub mod prompt;
pub mod qa;
pub mod registry;
pub mod service;
pub mod types;
pub mod vector_index;

pub use chunker::{split, ChunkConfig};
pub use embedder::EmbedderAdapter;
pub use errors::{RagError, RagResult};
pub use eviction::spawn_idle_sweeper;
pub use ingest::Ingestor;
pub use qa::{Answer, QaOptions, QaOrchestrator, SourceRef};
pub use registry::{Store, StoreFailure, StoreRegistry, StoreSummary};
pub use service::RagService;
pub use types::{Chunk, EmbeddedChunk, Language, ScoredChunk, StoreStatus};
pub use vector_index::VectorIndex;
