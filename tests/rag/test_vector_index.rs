// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Vector index construction and retrieval ordering

use docqa_node::rag::{Chunk, EmbeddedChunk, RagError, VectorIndex};

fn embedded(index: usize, vector: Vec<f32>) -> EmbeddedChunk {
    EmbeddedChunk {
        chunk: Chunk::new(index, format!("chunk {}", index)),
        vector,
    }
}

fn sample_index() -> VectorIndex {
    VectorIndex::build(vec![
        embedded(0, vec![1.0, 0.0, 0.0]),
        embedded(1, vec![0.0, 1.0, 0.0]),
        embedded(2, vec![0.7, 0.7, 0.0]),
        embedded(3, vec![0.0, 0.0, 1.0]),
    ])
    .unwrap()
}

#[test]
fn test_results_ordered_by_score() {
    let index = sample_index();
    let hits = index.query(&[1.0, 0.2, 0.0], 4).unwrap();

    let order: Vec<usize> = hits.iter().map(|h| h.chunk.sequence_index).collect();
    assert_eq!(order, vec![0, 2, 1, 3]);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_top_k_clamped_to_index_size() {
    let index = sample_index();
    let hits = index.query(&[0.0, 1.0, 0.0], 50).unwrap();
    assert_eq!(hits.len(), 4);

    let hits = index.query(&[0.0, 1.0, 0.0], 2).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk.sequence_index, 1);
}

#[test]
fn test_ties_broken_by_document_order() {
    let index = VectorIndex::build(vec![
        embedded(0, vec![0.0, 1.0]),
        embedded(1, vec![1.0, 0.0]),
        embedded(2, vec![2.0, 0.0]),
        embedded(3, vec![1.0, 0.0]),
    ])
    .unwrap();

    let hits = index.query(&[1.0, 0.0], 3).unwrap();
    let order: Vec<usize> = hits.iter().map(|h| h.chunk.sequence_index).collect();
    assert_eq!(order, vec![1, 2, 3]);
}

#[test]
fn test_zero_vectors_score_zero() {
    let index = VectorIndex::build(vec![
        embedded(0, vec![0.0, 0.0]),
        embedded(1, vec![1.0, 1.0]),
    ])
    .unwrap();

    let hits = index.query(&[1.0, 1.0], 2).unwrap();
    assert_eq!(hits[0].chunk.sequence_index, 1);
    assert_eq!(hits[1].score, 0.0);

    let hits = index.query(&[0.0, 0.0], 2).unwrap();
    assert!(hits.iter().all(|h| h.score == 0.0));
    assert_eq!(hits[0].chunk.sequence_index, 0);
}

#[test]
fn test_build_rejects_mixed_dimensions() {
    let result = VectorIndex::build(vec![
        embedded(0, vec![1.0, 0.0, 0.0]),
        embedded(1, vec![1.0, 0.0]),
    ]);
    assert!(matches!(
        result,
        Err(RagError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_build_rejects_empty_input() {
    assert!(matches!(
        VectorIndex::build(Vec::new()),
        Err(RagError::EmptyIndex)
    ));
}

#[test]
fn test_query_validation() {
    let index = sample_index();
    assert!(matches!(
        index.query(&[1.0, 0.0], 1),
        Err(RagError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        index.query(&[1.0, 0.0, 0.0], 0),
        Err(RagError::InvalidInput(_))
    ));
}

#[test]
fn test_model_identity_recorded() {
    let index = sample_index().with_model("keyword-3");
    assert_eq!(index.model(), Some("keyword-3"));
    assert_eq!(index.dimension(), 3);
    assert_eq!(index.len(), 4);
    assert_eq!(index.chunks().count(), 4);
}

#[test]
fn test_scores_bounded_by_direction() {
    let index = VectorIndex::build(vec![
        embedded(0, vec![1.0, 0.0]),
        embedded(1, vec![-1.0, 0.0]),
        embedded(2, vec![0.0, 1.0]),
    ])
    .unwrap();

    let hits = index.query(&[1.0, 0.0], 3).unwrap();
    assert!((hits[0].score - 1.0).abs() < 1e-6);
    assert_eq!(hits[1].chunk.sequence_index, 2);
    assert_eq!(hits[1].score, 0.0);
    assert!((hits[2].score + 1.0).abs() < 1e-6);
}

#[test]
fn test_large_components_do_not_overflow_scores() {
    let index = VectorIndex::build(vec![
        embedded(0, vec![1e20, 1e20]),
        embedded(1, vec![1.0, 0.0]),
    ])
    .unwrap();

    let hits = index.query(&[1e20, 1e20], 2).unwrap();
    assert_eq!(hits[0].chunk.sequence_index, 0);
    assert!((hits[0].score - 1.0).abs() < 1e-5);
    assert!(hits.iter().all(|h| h.score.is_finite()));

    let index = VectorIndex::build(vec![embedded(0, vec![1e30, 1e30])]).unwrap();
    let hits = index.query(&[1.0, 1.0], 1).unwrap();
    assert!((hits[0].score - 1.0).abs() < 1e-5);
}

#[test]
fn test_stored_vector_retrieves_itself_first() {
    let index = sample_index();
    for target in [vec![1.0, 0.0, 0.0], vec![0.7, 0.7, 0.0], vec![0.0, 0.0, 1.0]] {
        let hits = index.query(&target, 1).unwrap();
        assert!((hits[0].score - 1.0).abs() < 1e-5);
    }
    let hits = index.query(&[0.7, 0.7, 0.0], 1).unwrap();
    assert_eq!(hits[0].chunk.sequence_index, 2);
}

#[test]
fn test_full_query_returns_each_chunk_once() {
    let index = sample_index();
    let hits = index.query(&[0.3, 0.5, 0.1], 10).unwrap();

    let mut seen: Vec<usize> = hits.iter().map(|h| h.chunk.sequence_index).collect();
    seen.sort();
    assert_eq!(seen, vec![0, 1, 2, 3]);
}
