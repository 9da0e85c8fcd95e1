// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response types for the /quiz endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::quiz::types::{Difficulty, QuizQuestion, QUIZ_TYPES};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateQuizResponse {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizTypesResponse {
    pub quiz_types: BTreeMap<String, String>,
}

impl QuizTypesResponse {
    pub fn catalogue() -> Self {
        Self {
            quiz_types: QUIZ_TYPES
                .iter()
                .map(|(name, description)| (name.to_string(), description.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DifficultyLevelsResponse {
    pub difficulty_levels: Vec<Difficulty>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizHealthResponse {
    pub status: String,
    pub generator: String,
}
