// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! /qa question answering handlers

use axum::extract::{Path, State};
use axum::Json;

use super::request::AnswerRequest;
use super::response::{AnswerResponse, StoreDetailsResponse, SupportedLanguagesResponse};
use crate::api::http_server::AppState;
use crate::api::pdf::StoreHealthResponse;
use crate::api::ApiError;

/// POST /qa/answer
pub async fn answer_handler(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    request.validate()?;
    let answer = state
        .rag
        .answer(&request.vector_store_id, &request.question, &request.language)
        .await?;
    Ok(Json(answer))
}

/// GET /qa/vector_store/:id/info
pub async fn store_details_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoreDetailsResponse>, ApiError> {
    let store = state.rag.store_info(&id).await?;
    Ok(Json(StoreDetailsResponse::from(store)))
}

/// GET /qa/health
pub async fn qa_health_handler(State(state): State<AppState>) -> Json<StoreHealthResponse> {
    Json(StoreHealthResponse {
        status: "healthy".to_string(),
        vector_stores_count: state.rag.registry().active_count().await,
    })
}

/// GET /qa/supported_languages
pub async fn supported_languages_handler() -> Json<SupportedLanguagesResponse> {
    Json(SupportedLanguagesResponse::current())
}
