// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response types for the /qa endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::rag::registry::Store;
use crate::rag::types::{Language, StoreStatus};

pub use crate::rag::qa::Answer as AnswerResponse;

/// GET /qa/vector_store/:id/info
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreDetailsResponse {
    pub id: String,
    pub status: StoreStatus,
    /// Number of indexed chunks
    pub document_count: usize,
    pub dimension: Option<usize>,
    pub embedding_model: Option<String>,
}

impl From<Store> for StoreDetailsResponse {
    fn from(store: Store) -> Self {
        let (document_count, dimension, embedding_model) = match &store.index {
            Some(index) => (
                index.len(),
                Some(index.dimension()),
                index.model().map(str::to_string),
            ),
            None => (0, None, None),
        };
        Self {
            id: store.id,
            status: store.status,
            document_count,
            dimension,
            embedding_model,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupportedLanguagesResponse {
    pub supported_languages: BTreeMap<String, String>,
}

impl SupportedLanguagesResponse {
    pub fn current() -> Self {
        Self {
            supported_languages: Language::SUPPORTED
                .iter()
                .map(|lang| (lang.code().to_string(), lang.display_name().to_string()))
                .collect(),
        }
    }
}
