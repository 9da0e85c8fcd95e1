// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed-size chunking with optional overlap
//!
//! Windows are measured in Unicode scalar values so multi-byte scripts
//! (Arabic in particular) are never split inside a character.

use super::errors::{RagError, RagResult};
use super::types::Chunk;

/// Default window size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between consecutive windows
pub const DEFAULT_CHUNK_OVERLAP: usize = 0;

/// Chunking parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> RagResult<Self> {
        let config = Self {
            chunk_size,
            overlap,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RagResult<()> {
        if self.chunk_size == 0 {
            return Err(RagError::InvalidInput(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(RagError::InvalidInput(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Distance between the starts of consecutive windows
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Split text into consecutive windows of up to `chunk_size` characters
///
/// Each window advances by `chunk_size - overlap`. Windows are trimmed and
/// whitespace-only windows are skipped; `sequence_index` numbers the emitted
/// chunks from zero. Empty or whitespace-only input yields an empty vector.
pub fn split(text: &str, chunk_size: usize, overlap: usize) -> RagResult<Vec<Chunk>> {
    let config = ChunkConfig::new(chunk_size, overlap)?;
    Ok(split_with(text, &config))
}

/// Split text with an already validated configuration
pub fn split_with(text: &str, config: &ChunkConfig) -> Vec<Chunk> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, plus the end of the string
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = boundaries.len() - 1;
    let step = config.step();

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < total_chars {
        let end = (start + config.chunk_size).min(total_chars);
        let window = text[boundaries[start]..boundaries[end]].trim();

        if !window.is_empty() {
            chunks.push(Chunk::new(chunks.len(), window));
        }

        if end == total_chars {
            break;
        }
        start += step;
    }

    chunks
}
