// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! /quiz generation handlers

use axum::extract::State;
use axum::Json;

use super::request::GenerateQuizRequest;
use super::response::{
    DifficultyLevelsResponse, GenerateQuizResponse, QuizHealthResponse, QuizTypesResponse,
};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use crate::quiz::types::Difficulty;

/// POST /quiz/generate
pub async fn generate_quiz_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuizRequest>,
) -> Result<Json<GenerateQuizResponse>, ApiError> {
    let quiz = request.validate()?;
    let questions = state.quiz.generate(&quiz).await?;
    Ok(Json(GenerateQuizResponse { questions }))
}

/// GET /quiz/quiz_types
pub async fn quiz_types_handler() -> Json<QuizTypesResponse> {
    Json(QuizTypesResponse::catalogue())
}

/// GET /quiz/difficulty_levels
pub async fn difficulty_levels_handler() -> Json<DifficultyLevelsResponse> {
    Json(DifficultyLevelsResponse {
        difficulty_levels: Difficulty::ALL.to_vec(),
    })
}

/// GET /quiz/health
pub async fn quiz_health_handler(State(state): State<AppState>) -> Json<QuizHealthResponse> {
    Json(QuizHealthResponse {
        status: "healthy".to_string(),
        generator: state.quiz.generator_name().to_string(),
    })
}
