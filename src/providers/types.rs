// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Types shared by external provider implementations

use thiserror::Error;

/// Errors returned by document parsers, embedders and generators
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    /// API error from the provider
    #[error("Provider API error: {status} - {message}")]
    Api {
        /// HTTP status code (0 when the request never reached the server)
        status: u16,
        /// Error message
        message: String,
    },

    /// Provider request timed out at the transport level
    #[error("Provider timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Response arrived but did not have the expected shape
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Input document could not be parsed
    #[error("Parse failure: {0}")]
    Parse(String),

    /// Provider is not configured or not reachable
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Map a reqwest transport error, keeping timeouts distinct
    pub fn from_transport(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout { timeout_ms }
        } else {
            ProviderError::Api {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: err.to_string(),
            }
        }
    }
}

/// Text extracted from a binary document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedDocument {
    /// Page texts in document order
    pub pages: Vec<String>,
}

impl ParsedDocument {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            pages: vec![text.into()],
        }
    }

    /// Full document text with pages separated by newlines
    pub fn text(&self) -> String {
        self.pages.join("\n")
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
