// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::{language, pdf, qa, quiz};
use crate::config::ServerConfig;
use crate::language::LanguageGenerator;
use crate::quiz::QuizGenerator;
use crate::rag::RagService;
use crate::version::{API_VERSION, VERSION_NUMBER};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub rag: RagService,
    pub quiz: QuizGenerator,
    pub language: LanguageGenerator,
    /// Largest decoded document accepted by /pdf/process
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub api_version: String,
}

/// Build the full router with CORS, tracing and the upload size limit
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let body_limit = upload_body_limit(config.max_upload_bytes);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        // Document processing
        .route("/pdf/process", post(pdf::process_document_handler))
        .route(
            "/pdf/vector_store/:id",
            get(pdf::get_vector_store_handler).delete(pdf::delete_vector_store_handler),
        )
        .route("/pdf/vector_stores", get(pdf::list_vector_stores_handler))
        .route("/pdf/health", get(pdf::pdf_health_handler))
        // Question answering
        .route("/qa/answer", post(qa::answer_handler))
        .route("/qa/vector_store/:id/info", get(qa::store_details_handler))
        .route("/qa/health", get(qa::qa_health_handler))
        .route("/qa/supported_languages", get(qa::supported_languages_handler))
        // Quiz generation
        .route("/quiz/generate", post(quiz::generate_quiz_handler))
        .route("/quiz/quiz_types", get(quiz::quiz_types_handler))
        .route("/quiz/difficulty_levels", get(quiz::difficulty_levels_handler))
        .route("/quiz/health", get(quiz::quiz_health_handler))
        // Language content
        .route("/language/vocabulary", post(language::vocabulary_handler))
        .route("/language/sentence", post(language::sentence_handler))
        .route("/language/story", post(language::story_handler))
        .route("/language/cultural-fact", post(language::cultural_fact_handler))
        .route("/language/model-info", get(language::model_info_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Raw body limit for a decoded upload of `max_upload_bytes`
///
/// Uploads arrive base64-encoded inside JSON, so the body is about 4/3 larger.
pub fn upload_body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes
        .div_ceil(3)
        .saturating_mul(4)
        .saturating_add(4096)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Serve until `shutdown` is cancelled
pub async fn start_server(
    state: AppState,
    config: &ServerConfig,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app = build_router(state, config);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to the Document QA API".to_string(),
        version: VERSION_NUMBER.to_string(),
    })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        api_version: API_VERSION.to_string(),
    })
}
