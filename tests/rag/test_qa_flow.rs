// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// End-to-end question answering over in-process stores

use super::common::{
    keyword_service, service_with, test_config, three_chunk_document, FailingGenerator,
    KeywordEmbedder, RecordingGenerator, StalledGenerator,
};
use docqa_node::providers::PlainTextParser;
use docqa_node::rag::{RagError, RagService, StoreRegistry, StoreStatus};
use std::sync::Arc;
use tokio::sync::Semaphore;

#[tokio::test]
async fn test_answer_grounded_in_closest_chunk() {
    let generator = Arc::new(RecordingGenerator::new("Beta appears three times."));
    let service = keyword_service(generator.clone());
    let id = service
        .ingest(three_chunk_document().into_bytes(), None)
        .await
        .unwrap();

    let answer = service.answer(&id, "beta beta alpha", "en").await.unwrap();

    assert_eq!(answer.answer, "Beta appears three times.");
    assert_eq!(answer.sources[0].sequence_index, 1);
    // cos([1,2,0], [0,3,0]) = 2/sqrt(5)
    let expected_score = 2.0 / 5f32.sqrt();
    assert!((answer.sources[0].score - expected_score).abs() < 1e-4);
    assert!((answer.confidence - (expected_score + 1.0) / 2.0).abs() < 1e-4);
    assert!(!answer.context_truncated);

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.starts_with("Based on the following information: 'beta beta beta"));
    assert!(prompt.contains("alpha alpha alpha"));
    assert!(prompt.ends_with("answer this question: beta beta alpha"));
}

#[tokio::test]
async fn test_arabic_prompt_is_default_template() {
    let generator = Arc::new(RecordingGenerator::new("إجابة"));
    let service = keyword_service(generator.clone());
    let id = service
        .ingest(three_chunk_document().into_bytes(), None)
        .await
        .unwrap();

    let answer = service.answer(&id, "gamma?", "ar").await.unwrap();
    assert_eq!(answer.answer, "إجابة");

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.starts_with("بناءً على المعلومات التالية: 'gamma gamma"));
    assert!(prompt.ends_with("أجب عن هذا السؤال: gamma?"));
}

#[tokio::test]
async fn test_answer_on_building_store_not_ready() {
    let gate = Arc::new(Semaphore::new(0));
    let generator = Arc::new(RecordingGenerator::new("never"));
    let service = service_with(
        &test_config(),
        Arc::new(PlainTextParser::new()),
        Arc::new(KeywordEmbedder::gated(gate.clone())),
        generator.clone(),
    );

    let id = service
        .ingest_detached(three_chunk_document().into_bytes(), None)
        .await
        .unwrap();

    let result = service.answer(&id, "alpha", "en").await;
    assert!(matches!(
        result,
        Err(RagError::StoreNotReady {
            status: StoreStatus::Building,
            ..
        })
    ));
    assert_eq!(generator.call_count(), 0);
    gate.add_permits(100);
}

#[tokio::test]
async fn test_answer_on_failed_store_not_ready() {
    let service = keyword_service(Arc::new(RecordingGenerator::new("never")));
    let _ = service.ingest(b"    ".to_vec(), None).await;
    let (id, _) = service.list_stores().await.into_iter().next().unwrap();

    let result = service.answer(&id, "alpha", "en").await;
    assert!(matches!(
        result,
        Err(RagError::StoreNotReady {
            status: StoreStatus::Failed,
            ..
        })
    ));
}

#[tokio::test]
async fn test_answer_on_unknown_or_deleted_store() {
    let service = keyword_service(Arc::new(RecordingGenerator::new("never")));
    assert!(matches!(
        service.answer("missing", "alpha", "en").await,
        Err(RagError::StoreNotFound(_))
    ));

    let id = service
        .ingest(three_chunk_document().into_bytes(), None)
        .await
        .unwrap();
    service.delete_store(&id).await.unwrap();
    assert!(matches!(
        service.delete_store(&id).await,
        Err(RagError::NotFound(_))
    ));
    assert!(matches!(
        service.answer(&id, "alpha", "en").await,
        Err(RagError::StoreNotFound(_))
    ));
}

#[tokio::test]
async fn test_input_validation_before_lookup() {
    let generator = Arc::new(RecordingGenerator::new("never"));
    let service = keyword_service(generator.clone());

    assert!(matches!(
        service.answer("missing", "   ", "en").await,
        Err(RagError::InvalidInput(_))
    ));
    assert!(matches!(
        service.answer("missing", "alpha", "fr").await,
        Err(RagError::UnsupportedLanguage(_))
    ));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_embedding_model_mismatch_detected() {
    let registry = Arc::new(StoreRegistry::new());
    let config = test_config();
    let generator = Arc::new(RecordingGenerator::new("never"));

    let builder = RagService::with_registry(
        registry.clone(),
        &config,
        Arc::new(PlainTextParser::new()),
        Arc::new(KeywordEmbedder::named("keyword-v1")),
        generator.clone(),
    )
    .unwrap();
    let asker = RagService::with_registry(
        registry,
        &config,
        Arc::new(PlainTextParser::new()),
        Arc::new(KeywordEmbedder::named("keyword-v2")),
        generator.clone(),
    )
    .unwrap();

    let id = builder
        .ingest(three_chunk_document().into_bytes(), None)
        .await
        .unwrap();
    let result = asker.answer(&id, "alpha", "en").await;
    assert!(matches!(
        result,
        Err(RagError::EmbeddingModelMismatch { ref expected, ref actual })
            if expected == "keyword-v1" && actual == "keyword-v2"
    ));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_generation_failure_surfaces() {
    let service = keyword_service(Arc::new(FailingGenerator));
    let id = service
        .ingest(three_chunk_document().into_bytes(), None)
        .await
        .unwrap();

    let result = service.answer(&id, "alpha", "en").await;
    assert!(matches!(result, Err(RagError::GenerationProviderError(_))));
    // The store itself is unaffected
    assert_eq!(
        service.store_info(&id).await.unwrap().status,
        StoreStatus::Available
    );
}

#[tokio::test]
async fn test_generation_timeout() {
    let mut config = test_config();
    config.timeouts.generate_secs = 1;
    let service = service_with(
        &config,
        Arc::new(PlainTextParser::new()),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(StalledGenerator),
    );
    let id = service
        .ingest(three_chunk_document().into_bytes(), None)
        .await
        .unwrap();

    let result = service.answer(&id, "alpha", "en").await;
    assert!(matches!(
        result,
        Err(RagError::ProviderTimeout {
            timeout_ms: 1000,
            ..
        })
    ));
}

#[tokio::test]
async fn test_context_bound_drops_lowest_ranked_chunks() {
    let mut config = test_config();
    config.retrieval.max_context_chars = 20;
    let generator = Arc::new(RecordingGenerator::new("short"));
    let service = service_with(
        &config,
        Arc::new(PlainTextParser::new()),
        Arc::new(KeywordEmbedder::new()),
        generator.clone(),
    );
    let id = service
        .ingest(three_chunk_document().into_bytes(), None)
        .await
        .unwrap();

    let answer = service.answer(&id, "beta beta alpha", "en").await.unwrap();
    assert!(answer.context_truncated);
    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].sequence_index, 1);

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("'beta beta beta'"));
    assert!(!prompt.contains("alpha alpha alpha"));
}

#[tokio::test]
async fn test_concurrent_answers_share_store() {
    let service = keyword_service(Arc::new(RecordingGenerator::new("ok")));
    let id = service
        .ingest(three_chunk_document().into_bytes(), None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = service.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            service.answer(&id, "gamma", "en").await
        }));
    }
    for handle in handles {
        let answer = handle.await.unwrap().unwrap();
        assert_eq!(answer.sources[0].sequence_index, 2);
        assert!((answer.confidence - 1.0).abs() < 1e-6);
    }
}
