// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Quiz request and question types

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_QUESTIONS: usize = 1;
pub const MAX_QUESTIONS: usize = 10;
pub const DEFAULT_QUESTIONS: usize = 5;
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

/// Advertised quiz types and their descriptions
pub const QUIZ_TYPES: [(&str, &str); 5] = [
    ("vocabulary", "Tests knowledge of Arabic vocabulary"),
    ("grammar", "Focuses on Arabic grammar rules and usage"),
    ("culture", "Questions about Arab culture and traditions"),
    ("listening", "Audio-based questions to test listening comprehension"),
    ("reading", "Tests reading comprehension with short passages"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Medium,
    Advanced,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Medium,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Medium => "medium",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`
    pub correct_answer: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&self.options.len()) {
            return Err(format!(
                "expected {}-{} options, got {}",
                MIN_OPTIONS,
                MAX_OPTIONS,
                self.options.len()
            ));
        }
        if self.options.iter().any(|option| option.trim().is_empty()) {
            return Err("an option is empty".to_string());
        }
        if self.correct_answer >= self.options.len() {
            return Err(format!(
                "correct_answer {} out of range for {} options",
                self.correct_answer,
                self.options.len()
            ));
        }
        Ok(())
    }
}

/// Parameters for one generated quiz
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub quiz_type: String,
    pub difficulty: Difficulty,
    pub num_questions: usize,
}

impl QuizRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.quiz_type.trim().is_empty() {
            return Err("quiz_type must not be empty".to_string());
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.num_questions) {
            return Err(format!(
                "num_questions must be between {} and {}",
                MIN_QUESTIONS, MAX_QUESTIONS
            ));
        }
        Ok(())
    }
}
