// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! /pdf document processing and vector store management handlers

use axum::extract::{Path, State};
use axum::Json;
use std::collections::BTreeMap;
use tracing::info;

use super::request::ProcessDocumentRequest;
use super::response::{
    DeleteVectorStoreResponse, ProcessDocumentResponse, StoreHealthResponse, VectorStoreResponse,
};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use crate::rag::registry::StoreSummary;

/// POST /pdf/process
///
/// Decodes the upload and ingests it. With `background: true` the store id
/// is returned while the store is still `building`.
pub async fn process_document_handler(
    State(state): State<AppState>,
    Json(request): Json<ProcessDocumentRequest>,
) -> Result<Json<ProcessDocumentResponse>, ApiError> {
    let bytes = request.decode(state.max_upload_bytes)?;
    info!(
        file_name = request.file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = bytes.len(),
        background = request.background,
        "Document upload received"
    );

    let vector_store_id = if request.background {
        state.rag.ingest_detached(bytes, request.file_name).await?
    } else {
        state.rag.ingest(bytes, request.file_name).await?
    };

    Ok(Json(ProcessDocumentResponse { vector_store_id }))
}

/// GET /pdf/vector_store/:id
pub async fn get_vector_store_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VectorStoreResponse>, ApiError> {
    let store = state.rag.store_info(&id).await?;
    Ok(Json(VectorStoreResponse::from(store)))
}

/// DELETE /pdf/vector_store/:id
pub async fn delete_vector_store_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteVectorStoreResponse>, ApiError> {
    state.rag.delete_store(&id).await?;
    Ok(Json(DeleteVectorStoreResponse::for_store(&id)))
}

/// GET /pdf/vector_stores
pub async fn list_vector_stores_handler(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, StoreSummary>> {
    Json(state.rag.list_stores().await)
}

/// GET /pdf/health
pub async fn pdf_health_handler(State(state): State<AppState>) -> Json<StoreHealthResponse> {
    Json(StoreHealthResponse {
        status: "healthy".to_string(),
        vector_stores_count: state.rag.registry().active_count().await,
    })
}
