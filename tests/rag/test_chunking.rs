// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Chunking properties over whole documents

use docqa_node::rag::chunker::{split, ChunkConfig};
use docqa_node::rag::RagError;

#[test]
fn test_chunks_reassemble_without_overlap() {
    let text = "abcdefghijklmnopqrstuvwxyz0123456789".repeat(11);
    let chunks = split(&text, 37, 0).unwrap();

    let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(rebuilt, text);
    assert!(chunks.iter().all(|c| c.text.chars().count() <= 37));
}

#[test]
fn test_arabic_text_never_split_inside_character() {
    let text = "بسماللهالرحمنالرحيم".repeat(20);
    let chunks = split(&text, 7, 0).unwrap();

    let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(rebuilt, text);
    for chunk in &chunks {
        assert!(chunk.text.chars().count() <= 7);
    }
}

#[test]
fn test_overlapping_windows_share_characters() {
    let text: String = ('a'..='z').cycle().take(100).collect();
    let chunks = split(&text, 10, 3).unwrap();

    for pair in chunks.windows(2) {
        let previous: Vec<char> = pair[0].text.chars().collect();
        let next: Vec<char> = pair[1].text.chars().collect();
        if previous.len() == 10 {
            assert_eq!(&previous[7..], &next[..3]);
        }
    }
    // Windows start every 7 characters and the last one reaches the end
    assert_eq!(chunks.len(), 14);
    assert!(text.ends_with(&chunks.last().unwrap().text));
}

#[test]
fn test_sequence_indices_are_contiguous() {
    let text = "word ".repeat(400);
    let chunks = split(&text, 64, 16).unwrap();

    for (position, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.sequence_index, position);
    }
}

#[test]
fn test_whitespace_windows_are_skipped() {
    let text = format!("{}{}{}", "first", " ".repeat(25), "second");
    let chunks = split(&text, 10, 0).unwrap();

    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert_eq!(chunks[1].sequence_index, 1);
}

#[test]
fn test_invalid_configuration_rejected() {
    assert!(matches!(split("text", 0, 0), Err(RagError::InvalidInput(_))));
    assert!(matches!(split("text", 5, 5), Err(RagError::InvalidInput(_))));
    assert!(ChunkConfig::new(5, 4).is_ok());
}

#[test]
fn test_default_size_reconstructs_long_document() {
    let text: String = (0..5000)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();
    let chunks = split(&text, 1000, 0).unwrap();

    assert_eq!(chunks.len(), 5);
    let rebuilt: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(rebuilt, text);
}
