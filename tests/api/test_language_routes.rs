// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// /language routes

use super::common::{send, test_app};
use axum::http::{Method, StatusCode};

const VOCABULARY: &str = r#"```json
{"words": [
  {"word": "تفاحة", "explanation": "فاكهة حمراء أو خضراء"},
  {"word": "خبز", "explanation": "طعام مصنوع من الدقيق"}
]}
```"#;

#[tokio::test]
async fn test_vocabulary_returns_typed_words() {
    let app = test_app(VOCABULARY);
    let (status, body) = send(&app, Method::POST, "/language/vocabulary?category=food", None).await;

    assert_eq!(status, StatusCode::OK);
    let words = body["words"].as_array().unwrap();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0]["word"], "تفاحة");
    assert_eq!(words[1]["explanation"], "طعام مصنوع من الدقيق");
}

#[tokio::test]
async fn test_vocabulary_requires_category() {
    let app = test_app(VOCABULARY);
    let (status, body) = send(&app, Method::POST, "/language/vocabulary", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "category");
}

#[tokio::test]
async fn test_line_delimited_vocabulary_is_bad_gateway() {
    let app = test_app("تفاحة: فاكهة\nخبز: طعام");
    let (status, body) = send(&app, Method::POST, "/language/vocabulary?category=food", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["details"]["code"], "GENERATION_PROVIDER_ERROR");
}

#[tokio::test]
async fn test_sentence_and_story() {
    let app = test_app(r#"{"sentence": "أنا طالب", "explanation": "I am a student"}"#);
    let (status, body) = send(&app, Method::POST, "/language/sentence", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentence"], "أنا طالب");
    assert_eq!(body["explanation"], "I am a student");

    let app = test_app(r#"{"story": "كان هناك قط صغير.", "explanation": "A small cat"}"#);
    let (status, body) = send(&app, Method::POST, "/language/story", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["story"], "كان هناك قط صغير.");
}

#[tokio::test]
async fn test_story_without_explanation_rejected() {
    // Two paragraphs of prose are not a story object
    let app = test_app("كان هناك قط صغير.\n\nThe story is about a cat.");
    let (status, _) = send(&app, Method::POST, "/language/story", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_cultural_fact() {
    let app = test_app(r#"Here you go: {"fact": "القهوة العربية رمز للضيافة"}"#);
    let (status, body) = send(&app, Method::POST, "/language/cultural-fact", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fact"], "القهوة العربية رمز للضيافة");
}

#[tokio::test]
async fn test_model_info() {
    let app = test_app("");
    let (status, body) = send(&app, Method::GET, "/language/model-info", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "canned-1");
    assert_eq!(body["provider"], "canned");
}
