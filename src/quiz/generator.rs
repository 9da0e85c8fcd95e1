// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Structured quiz generation
//!
//! The model is asked for a JSON array; the reply is parsed into typed
//! questions and validated. Malformed output is an error, never filler.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use super::types::{QuizQuestion, QuizRequest};
use crate::providers::{GenerationProvider, ProviderError};
use crate::rag::errors::{RagError, RagResult};

const GENERATOR_LABEL: &str = "generation provider";

#[derive(Clone)]
pub struct QuizGenerator {
    generator: Arc<dyn GenerationProvider>,
    timeout: Duration,
}

impl QuizGenerator {
    pub fn new(generator: Arc<dyn GenerationProvider>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    pub async fn generate(&self, request: &QuizRequest) -> RagResult<Vec<QuizQuestion>> {
        request.validate().map_err(RagError::InvalidInput)?;

        let prompt = build_prompt(request);
        let raw = timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| RagError::ProviderTimeout {
                provider: GENERATOR_LABEL.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            })?
            .map_err(|e| match e {
                ProviderError::Timeout { timeout_ms } => RagError::ProviderTimeout {
                    provider: GENERATOR_LABEL.to_string(),
                    timeout_ms,
                },
                other => RagError::GenerationProviderError(other.to_string()),
            })?;

        let questions = parse_questions(&raw, request.num_questions).map_err(|reason| {
            warn!(quiz_type = %request.quiz_type, "Rejected quiz output: {}", reason);
            RagError::GenerationProviderError(format!("malformed quiz output: {}", reason))
        })?;

        info!(
            quiz_type = %request.quiz_type,
            difficulty = %request.difficulty,
            count = questions.len(),
            "Quiz generated"
        );
        Ok(questions)
    }
}

pub fn build_prompt(request: &QuizRequest) -> String {
    format!(
        "Create an Arabic language quiz with the following parameters:\n\
         Type: {}\n\
         Difficulty: {}\n\
         Number of questions: {}\n\n\
         For each question, provide:\n\
         1. The question in Arabic\n\
         2. 3 or 4 answer options in Arabic\n\
         3. The index of the correct answer (0-based)\n\
         4. A brief explanation of the correct answer in Arabic\n\n\
         Respond with only a JSON array of objects, each containing 'question', \
         'options', 'correct_answer', and 'explanation' fields.",
        request.quiz_type, request.difficulty, request.num_questions
    )
}

/// Extract, deserialize and validate the question array in `raw`
///
/// Models often wrap JSON in prose or code fences, so the outermost
/// `[...]` span is used. Extra questions are dropped; too few is an error.
pub fn parse_questions(raw: &str, expected: usize) -> Result<Vec<QuizQuestion>, String> {
    let start = raw.find('[').ok_or("no JSON array in output")?;
    let end = raw.rfind(']').ok_or("no JSON array in output")?;
    if end < start {
        return Err("no JSON array in output".to_string());
    }

    let mut questions: Vec<QuizQuestion> =
        serde_json::from_str(&raw[start..=end]).map_err(|e| format!("invalid JSON: {}", e))?;

    for (i, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|reason| format!("question {}: {}", i, reason))?;
    }
    if questions.len() < expected {
        return Err(format!(
            "expected {} questions, got {}",
            expected,
            questions.len()
        ));
    }
    questions.truncate(expected);
    Ok(questions)
}
