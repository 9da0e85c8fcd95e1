// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Typed language-learning content returned by the generator

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Words requested per vocabulary call
pub const VOCABULARY_SIZE: usize = 5;

/// Content the model must return as a JSON object
pub trait GeneratedContent: DeserializeOwned {
    /// Short name used in logs and error messages
    const KIND: &'static str;

    fn validate(&self) -> Result<(), String>;
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} is empty", field))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyWord {
    pub word: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub words: Vec<VocabularyWord>,
}

impl GeneratedContent for Vocabulary {
    const KIND: &'static str = "vocabulary";

    fn validate(&self) -> Result<(), String> {
        if self.words.is_empty() {
            return Err("no words".to_string());
        }
        for (i, entry) in self.words.iter().enumerate() {
            require("word", &entry.word).map_err(|e| format!("word {}: {}", i, e))?;
            require("explanation", &entry.explanation)
                .map_err(|e| format!("word {}: {}", i, e))?;
        }
        Ok(())
    }
}

/// Beginner sentence with its meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub sentence: String,
    pub explanation: String,
}

impl GeneratedContent for Sentence {
    const KIND: &'static str = "sentence";

    fn validate(&self) -> Result<(), String> {
        require("sentence", &self.sentence)?;
        require("explanation", &self.explanation)
    }
}

/// Very short children's story with its meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub story: String,
    pub explanation: String,
}

impl GeneratedContent for Story {
    const KIND: &'static str = "story";

    fn validate(&self) -> Result<(), String> {
        require("story", &self.story)?;
        require("explanation", &self.explanation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalFact {
    pub fact: String,
}

impl GeneratedContent for CulturalFact {
    const KIND: &'static str = "cultural fact";

    fn validate(&self) -> Result<(), String> {
        require("fact", &self.fact)
    }
}
