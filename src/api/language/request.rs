// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Query parameters for POST /language/vocabulary

use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// `?category=food`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyQuery {
    #[serde(default)]
    pub category: Option<String>,
}

impl VocabularyQuery {
    /// The trimmed category; missing or blank is a validation error
    pub fn category(&self) -> Result<&str, ApiError> {
        match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => Ok(category),
            _ => Err(ApiError::ValidationError {
                field: "category".to_string(),
                message: "category query parameter is required".to_string(),
            }),
        }
    }
}
