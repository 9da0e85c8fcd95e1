// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! AnswerRequest type for POST /qa/answer

use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// Request body for POST /qa/answer
///
/// # Example
/// ```json
/// {
///   "question": "ما هو موضوع الدرس؟",
///   "vector_store_id": "2f0c...",
///   "language": "ar"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub vector_store_id: String,
    /// Default: "ar"
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "ar".to_string()
}

impl AnswerRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.vector_store_id.trim().is_empty() {
            return Err(ApiError::ValidationError {
                field: "vector_store_id".to_string(),
                message: "vector_store_id must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
