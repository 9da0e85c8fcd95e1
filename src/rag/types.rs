// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core value types shared by the ingestion and answer pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bounded segment of a document's extracted text
///
/// `sequence_index` is the chunk's rank in original document order and is
/// used for tie-breaking during retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub sequence_index: usize,
    pub text: String,
}

impl Chunk {
    pub fn new(sequence_index: usize, text: impl Into<String>) -> Self {
        Self {
            sequence_index,
            text: text.into(),
        }
    }
}

/// A chunk paired with its embedding vector
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// A retrieval hit: the chunk and its cosine similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Lifecycle state of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreStatus {
    Building,
    Available,
    Failed,
    Deleted,
}

impl StoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Building => "building",
            StoreStatus::Available => "available",
            StoreStatus::Failed => "failed",
            StoreStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer language for prompt composition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    /// All languages with a prompt template, in display order
    pub const SUPPORTED: [Language; 2] = [Language::Ar, Language::En];

    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ar" => Some(Language::Ar),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Ar => "Arabic",
            Language::En => "English",
        }
    }
}
