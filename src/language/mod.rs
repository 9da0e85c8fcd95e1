// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Arabic learning content: vocabulary, sentences, stories and cultural facts

pub mod generator;
pub mod types;

pub use generator::{parse_content, LanguageGenerator};
pub use types::{CulturalFact, Sentence, Story, Vocabulary, VocabularyWord};
