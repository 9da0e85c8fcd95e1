// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! /language content generation handlers

use axum::extract::{Query, State};
use axum::Json;

use super::request::VocabularyQuery;
use super::response::ModelInfoResponse;
use crate::api::http_server::AppState;
use crate::api::ApiError;
use crate::language::{CulturalFact, Sentence, Story, Vocabulary};

/// POST /language/vocabulary?category=...
pub async fn vocabulary_handler(
    State(state): State<AppState>,
    Query(query): Query<VocabularyQuery>,
) -> Result<Json<Vocabulary>, ApiError> {
    let category = query.category()?;
    Ok(Json(state.language.vocabulary(category).await?))
}

/// POST /language/sentence
pub async fn sentence_handler(State(state): State<AppState>) -> Result<Json<Sentence>, ApiError> {
    Ok(Json(state.language.sentence().await?))
}

/// POST /language/story
pub async fn story_handler(State(state): State<AppState>) -> Result<Json<Story>, ApiError> {
    Ok(Json(state.language.story().await?))
}

/// POST /language/cultural-fact
pub async fn cultural_fact_handler(
    State(state): State<AppState>,
) -> Result<Json<CulturalFact>, ApiError> {
    Ok(Json(state.language.cultural_fact().await?))
}

/// GET /language/model-info
pub async fn model_info_handler(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        model: state.language.model().to_string(),
        provider: state.language.generator_name().to_string(),
    })
}
