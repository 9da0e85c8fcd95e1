// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ProcessDocumentRequest type for POST /pdf/process

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// Request body for POST /pdf/process
///
/// # Example
/// ```json
/// {
///   "file_content": "JVBERi0xLjQK...",
///   "file_name": "lesson.pdf",
///   "background": false
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDocumentRequest {
    /// Base64-encoded document bytes (PDF or UTF-8 text)
    pub file_content: String,

    /// Original file name, echoed back in store listings
    #[serde(default)]
    pub file_name: Option<String>,

    /// Return immediately and build the store in the background
    #[serde(default)]
    pub background: bool,
}

impl ProcessDocumentRequest {
    /// Decode `file_content`, rejecting empty, malformed or oversized payloads
    ///
    /// `max_bytes` bounds the decoded document, not the base64 text.
    pub fn decode(&self, max_bytes: usize) -> Result<Vec<u8>, ApiError> {
        // Tolerate data URLs and line-wrapped base64
        let encoded = match self.file_content.split_once(";base64,") {
            Some((_, data)) => data,
            None => self.file_content.as_str(),
        };
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

        if compact.is_empty() {
            return Err(ApiError::ValidationError {
                field: "file_content".to_string(),
                message: "file_content must not be empty".to_string(),
            });
        }

        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| ApiError::ValidationError {
                field: "file_content".to_string(),
                message: format!("file_content is not valid base64: {}", e),
            })?;

        if bytes.is_empty() {
            return Err(ApiError::ValidationError {
                field: "file_content".to_string(),
                message: "decoded document is empty".to_string(),
            });
        }
        if bytes.len() > max_bytes {
            return Err(ApiError::ValidationError {
                field: "file_content".to_string(),
                message: format!(
                    "document is {} bytes, the upload limit is {} bytes",
                    bytes.len(),
                    max_bytes
                ),
            });
        }
        Ok(bytes)
    }
}
