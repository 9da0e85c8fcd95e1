// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response types for the /pdf endpoints

use serde::{Deserialize, Serialize};

use crate::rag::registry::{Store, StoreFailure};
use crate::rag::types::StoreStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessDocumentResponse {
    pub vector_store_id: String,
}

/// GET /pdf/vector_store/:id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorStoreResponse {
    pub id: String,
    pub file_name: Option<String>,
    pub status: StoreStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StoreFailure>,
}

impl From<Store> for VectorStoreResponse {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            file_name: store.source_name,
            status: store.status,
            error: store.failure,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteVectorStoreResponse {
    pub message: String,
}

impl DeleteVectorStoreResponse {
    pub fn for_store(id: &str) -> Self {
        Self {
            message: format!("Vector store {} has been deleted", id),
        }
    }
}

/// Health payload shared by /pdf/health and /qa/health
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreHealthResponse {
    pub status: String,
    pub vector_stores_count: usize,
}
