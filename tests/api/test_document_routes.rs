// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// /pdf routes: upload, inspect, list and delete vector stores

use super::common::{encode, send, test_app, test_app_with_upload_limit, upload};
use axum::http::{Method, StatusCode};
use serde_json::json;

const PETS: &str = "The cat sat on the mat all day. The dog barked at the mailman.";

#[tokio::test]
async fn test_root_and_health() {
    let app = test_app("ok");

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Document QA"));

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_upload_then_get_store() {
    let app = test_app("ok");
    let id = upload(&app, PETS).await;

    let (status, body) = send(&app, Method::GET, &format!("/pdf/vector_store/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["status"], "available");
    assert_eq!(body["file_name"], "pets.txt");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_background_upload_returns_id() {
    let app = test_app("ok");
    let (status, body) = send(
        &app,
        Method::POST,
        "/pdf/process",
        Some(json!({ "file_content": encode(PETS), "background": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["vector_store_id"].as_str().unwrap().to_string();

    // Eventually available
    let mut last = String::new();
    for _ in 0..100 {
        let (_, body) = send(&app, Method::GET, &format!("/pdf/vector_store/{}", id), None).await;
        last = body["status"].as_str().unwrap_or_default().to_string();
        if last == "available" {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(last, "available");
}

#[tokio::test]
async fn test_invalid_base64_rejected() {
    let app = test_app("ok");
    let (status, body) = send(
        &app,
        Method::POST,
        "/pdf/process",
        Some(json!({ "file_content": "not base64!!" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["details"]["field"], "file_content");
}

#[tokio::test]
async fn test_upload_limit_applies_to_decoded_bytes() {
    let app = test_app_with_upload_limit(16);

    let (status, body) = send(
        &app,
        Method::POST,
        "/pdf/process",
        Some(json!({ "file_content": encode(&"cat dog ".repeat(5)) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
    assert_eq!(body["details"]["field"], "file_content");

    // Exactly at the limit is accepted
    let id = upload(&app, "cat cat cat dog ").await;
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_empty_document_is_bad_request() {
    let app = test_app("ok");
    let (status, body) = send(
        &app,
        Method::POST,
        "/pdf/process",
        Some(json!({ "file_content": encode("     ") })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "EMPTY_DOCUMENT");

    // The failed store stays visible with its cause
    let (_, listing) = send(&app, Method::GET, "/pdf/vector_stores", None).await;
    let stores = listing.as_object().unwrap();
    assert_eq!(stores.len(), 1);
    let (id, summary) = stores.iter().next().unwrap();
    assert_eq!(summary["status"], "failed");

    let (_, body) = send(&app, Method::GET, &format!("/pdf/vector_store/{}", id), None).await;
    assert_eq!(body["error"]["code"], "EMPTY_DOCUMENT");
}

#[tokio::test]
async fn test_list_stores_keyed_by_id() {
    let app = test_app("ok");
    let first = upload(&app, PETS).await;
    let second = upload(&app, "Only a cat here.").await;

    let (status, body) = send(&app, Method::GET, "/pdf/vector_stores", None).await;
    assert_eq!(status, StatusCode::OK);
    let stores = body.as_object().unwrap();
    assert_eq!(stores.len(), 2);
    assert_eq!(stores[&first]["id"], first.as_str());
    assert_eq!(stores[&second]["file_name"], "pets.txt");

    let (_, health) = send(&app, Method::GET, "/pdf/health", None).await;
    assert_eq!(health["vector_stores_count"], 2);
}

#[tokio::test]
async fn test_delete_twice_then_not_found() {
    let app = test_app("ok");
    let id = upload(&app, PETS).await;
    let uri = format!("/pdf/vector_store/{}", id);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains(&id));

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listing) = send(&app, Method::GET, "/pdf/vector_stores", None).await;
    assert!(listing.as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_store_not_found() {
    let app = test_app("ok");
    let (status, _) = send(&app, Method::GET, "/pdf/vector_store/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
