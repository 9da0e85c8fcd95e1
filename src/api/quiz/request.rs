// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GenerateQuizRequest type for POST /quiz/generate

use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::quiz::types::{Difficulty, QuizRequest, DEFAULT_QUESTIONS, MAX_QUESTIONS, MIN_QUESTIONS};

/// Request body for POST /quiz/generate
///
/// # Example
/// ```json
/// {
///   "quiz_type": "vocabulary",
///   "difficulty": "beginner",
///   "num_questions": 3
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuizRequest {
    pub quiz_type: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// 1-10, default 5
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
}

fn default_num_questions() -> usize {
    DEFAULT_QUESTIONS
}

impl GenerateQuizRequest {
    pub fn validate(&self) -> Result<QuizRequest, ApiError> {
        if self.quiz_type.trim().is_empty() {
            return Err(ApiError::ValidationError {
                field: "quiz_type".to_string(),
                message: "quiz_type must not be empty".to_string(),
            });
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.num_questions) {
            return Err(ApiError::ValidationError {
                field: "num_questions".to_string(),
                message: format!(
                    "num_questions must be between {} and {}",
                    MIN_QUESTIONS, MAX_QUESTIONS
                ),
            });
        }
        Ok(QuizRequest {
            quiz_type: self.quiz_type.trim().to_string(),
            difficulty: self.difficulty,
            num_questions: self.num_questions,
        })
    }
}
