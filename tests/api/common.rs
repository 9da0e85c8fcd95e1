// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Router fixtures with in-process providers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use docqa_node::api::{build_router, AppState};
use docqa_node::config::NodeConfig;
use docqa_node::language::LanguageGenerator;
use docqa_node::providers::{
    EmbeddingProvider, GenerationProvider, PlainTextParser, ProviderError,
};
use docqa_node::quiz::QuizGenerator;
use docqa_node::rag::RagService;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Occurrence counts of "cat" and "dog"
pub struct PetEmbedder;

#[async_trait]
impl EmbeddingProvider for PetEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                vec![
                    lower.matches("cat").count() as f32,
                    lower.matches("dog").count() as f32,
                ]
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "pets-2"
    }
}

/// Replies with a fixed string
pub struct CannedGenerator(pub String);

#[async_trait]
impl GenerationProvider for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "canned"
    }
}

pub fn test_app(reply: &str) -> Router {
    let mut config = NodeConfig::default();
    config.retrieval.chunk_size = 30;
    config.retrieval.chunk_overlap = 0;
    config.timeouts.generate_secs = 5;
    app_with_config(reply, config)
}

/// Router whose decoded uploads are capped at `max_upload_bytes`
pub fn test_app_with_upload_limit(max_upload_bytes: usize) -> Router {
    let mut config = NodeConfig::default();
    config.retrieval.chunk_size = 30;
    config.retrieval.chunk_overlap = 0;
    config.server.max_upload_bytes = max_upload_bytes;
    app_with_config("unused", config)
}

fn app_with_config(reply: &str, config: NodeConfig) -> Router {
    let generator: Arc<dyn GenerationProvider> = Arc::new(CannedGenerator(reply.to_string()));
    let rag = RagService::new(
        &config,
        Arc::new(PlainTextParser::new()),
        Arc::new(PetEmbedder),
        generator.clone(),
    )
    .unwrap();
    let language = LanguageGenerator::new(generator.clone(), "canned-1", Duration::from_secs(5));
    let quiz = QuizGenerator::new(generator, Duration::from_secs(5));

    let state = AppState {
        rag,
        quiz,
        language,
        max_upload_bytes: config.server.max_upload_bytes,
    };
    build_router(state, &config.server)
}

pub fn encode(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Upload `text` synchronously and return the new store id
pub async fn upload(app: &Router, text: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/pdf/process",
        Some(serde_json::json!({
            "file_content": encode(text),
            "file_name": "pets.txt"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "upload failed: {}", body);
    body["vector_store_id"].as_str().unwrap().to_string()
}
