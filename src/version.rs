// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Document QA Node

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-document-qa-2025-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// HTTP API version reported by health endpoints
pub const API_VERSION: &str = "1.0.0";

/// Build date
pub const BUILD_DATE: &str = "2025-10-19";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "pdf-ingestion",
    "plain-text-ingestion",
    "exact-cosine-retrieval",
    "grounded-answers",
    "arabic-english-prompts",
    "quiz-generation",
    "idle-store-eviction",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Document QA Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
