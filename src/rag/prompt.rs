// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Grounding context assembly and per-language prompt templates

use super::types::{Language, ScoredChunk};

const CONTEXT_SEPARATOR: &str = "\n\n";

/// Grounding context built from retrieved chunks
#[derive(Debug, Clone, PartialEq)]
pub struct GroundingContext {
    pub text: String,
    /// Number of retrieved chunks that made it into `text`
    pub chunks_used: usize,
    /// True if any chunk was dropped or cut to fit the bound
    pub truncated: bool,
}

/// Join chunk texts in the given (score-descending) order within `max_chars`
///
/// Lower-ranked chunks are dropped first. If the best chunk alone exceeds
/// the bound it is cut to `max_chars` characters.
pub fn build_context(hits: &[ScoredChunk], max_chars: usize) -> GroundingContext {
    let separator_len = CONTEXT_SEPARATOR.chars().count();
    let mut text = String::new();
    let mut used_chars = 0;
    let mut chunks_used = 0;

    for hit in hits {
        let chunk_chars = hit.chunk.text.chars().count();
        let needed = if chunks_used == 0 {
            chunk_chars
        } else {
            chunk_chars + separator_len
        };

        if used_chars + needed > max_chars {
            if chunks_used == 0 {
                text = hit.chunk.text.chars().take(max_chars).collect();
                chunks_used = 1;
            }
            return GroundingContext {
                text,
                chunks_used,
                truncated: true,
            };
        }

        if chunks_used > 0 {
            text.push_str(CONTEXT_SEPARATOR);
        }
        text.push_str(&hit.chunk.text);
        used_chars += needed;
        chunks_used += 1;
    }

    GroundingContext {
        text,
        chunks_used,
        truncated: false,
    }
}

/// Compose the generation prompt for `language`
pub fn compose(language: Language, context: &str, question: &str) -> String {
    match language {
        Language::Ar => format!(
            "بناءً على المعلومات التالية: '{}'، أجب عن هذا السؤال: {}",
            context, question
        ),
        Language::En => format!(
            "Based on the following information: '{}', answer this question: {}",
            context, question
        ),
    }
}
