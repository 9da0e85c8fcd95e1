// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::rag::errors::RagError;
use crate::rag::types::StoreStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub request_id: Option<String>,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    ValidationError { field: String, message: String },
    /// Typed failure from the ingestion/answer pipeline
    Pipeline(RagError),
}

impl ApiError {
    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::Pipeline(err) => {
                let mut details = HashMap::new();
                details.insert(
                    "code".to_string(),
                    serde_json::Value::String(err.error_code().to_string()),
                );
                details.insert(
                    "retryable".to_string(),
                    serde_json::Value::Bool(err.is_retryable()),
                );
                if let RagError::StoreNotReady { status, .. } = err {
                    details.insert(
                        "status".to_string(),
                        serde_json::Value::String(status.to_string()),
                    );
                }
                (pipeline_error_type(err), err.user_message(), Some(details))
            }
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            request_id,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::ValidationError { .. } => 400,
            ApiError::Pipeline(err) => pipeline_status(err),
        }
    }
}

fn pipeline_status(err: &RagError) -> u16 {
    match err {
        RagError::InvalidInput(_)
        | RagError::ParseError(_)
        | RagError::EmptyDocument
        | RagError::UnsupportedLanguage(_) => 400,
        RagError::NotFound(_) | RagError::StoreNotFound(_) => 404,
        RagError::StoreNotReady {
            status: StoreStatus::Building,
            ..
        } => 503,
        RagError::StoreNotReady { .. }
        | RagError::EmbeddingModelMismatch { .. }
        | RagError::Cancelled(_) => 409,
        RagError::EmbeddingProviderError(_) | RagError::GenerationProviderError(_) => 502,
        RagError::ProviderTimeout { .. } => 504,
        RagError::DimensionMismatch { .. }
        | RagError::EmptyIndex
        | RagError::InvalidTransition { .. }
        | RagError::NoRelevantContent(_)
        | RagError::InternalError(_) => 500,
    }
}

fn pipeline_error_type(err: &RagError) -> &'static str {
    match pipeline_status(err) {
        400 => "invalid_request",
        404 => "not_found",
        409 => "conflict",
        502 => "bad_gateway",
        503 => "service_unavailable",
        504 => "timeout",
        _ => "internal_error",
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::Pipeline(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", self);
        }
        (status, Json(self.to_response(None))).into_response()
    }
}
