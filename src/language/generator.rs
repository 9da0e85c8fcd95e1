// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Arabic learning content generation
//!
//! Every request asks the model for a single JSON object which is parsed
//! into a typed value and validated. Unusable output is a provider error.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use super::types::{CulturalFact, GeneratedContent, Sentence, Story, Vocabulary, VOCABULARY_SIZE};
use crate::providers::{GenerationProvider, ProviderError};
use crate::rag::errors::{RagError, RagResult};

const GENERATOR_LABEL: &str = "generation provider";
const MAX_CATEGORY_CHARS: usize = 100;

#[derive(Clone)]
pub struct LanguageGenerator {
    generator: Arc<dyn GenerationProvider>,
    model: String,
    timeout: Duration,
}

impl LanguageGenerator {
    pub fn new(
        generator: Arc<dyn GenerationProvider>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            model: model.into(),
            timeout,
        }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Model id the generation provider was configured with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Up to five Arabic words related to `category`, each explained in Arabic
    pub async fn vocabulary(&self, category: &str) -> RagResult<Vocabulary> {
        let category = category.trim();
        if category.is_empty() {
            return Err(RagError::InvalidInput("category must not be empty".to_string()));
        }
        if category.chars().count() > MAX_CATEGORY_CHARS {
            return Err(RagError::InvalidInput(format!(
                "category must be at most {} characters",
                MAX_CATEGORY_CHARS
            )));
        }

        let prompt = format!(
            "Create {} Arabic words related to {} with a simple explanation for each word in Arabic.\n\
             Respond with only a JSON object of the form \
             {{\"words\": [{{\"word\": \"...\", \"explanation\": \"...\"}}]}}.",
            VOCABULARY_SIZE, category
        );
        let mut vocabulary: Vocabulary = self.request(&prompt).await?;
        vocabulary.words.truncate(VOCABULARY_SIZE);
        Ok(vocabulary)
    }

    pub async fn sentence(&self) -> RagResult<Sentence> {
        self.request(
            "Create a simple Arabic sentence suitable for beginners with an explanation of its meaning.\n\
             Respond with only a JSON object with the fields 'sentence' and 'explanation'.",
        )
        .await
    }

    pub async fn story(&self) -> RagResult<Story> {
        self.request(
            "Tell a very short story (3-4 sentences) in Arabic for children, then explain its meaning simply.\n\
             Respond with only a JSON object with the fields 'story' and 'explanation'.",
        )
        .await
    }

    pub async fn cultural_fact(&self) -> RagResult<CulturalFact> {
        self.request(
            "Share an interesting fact about Arabic culture or an Arabic-speaking country.\n\
             Respond with only a JSON object with the field 'fact'.",
        )
        .await
    }

    async fn request<T: GeneratedContent>(&self, prompt: &str) -> RagResult<T> {
        let raw = timeout(self.timeout, self.generator.generate(prompt))
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

        let content = parse_content::<T>(&raw).map_err(|reason| {
            warn!(kind = T::KIND, "Rejected generated content: {}", reason);
            RagError::GenerationProviderError(format!("malformed {} output: {}", T::KIND, reason))
        })?;

        info!(kind = T::KIND, generator = self.generator.name(), "Language content generated");
        Ok(content)
    }
}

/// Extract, deserialize and validate the JSON object in `raw`
///
/// The outermost `{...}` span is used so prose or code fences around the
/// object are tolerated.
pub fn parse_content<T: GeneratedContent>(raw: &str) -> Result<T, String> {
    let start = raw.find('{').ok_or("no JSON object in output")?;
    let end = raw.rfind('}').ok_or("no JSON object in output")?;
    if end < start {
        return Err("no JSON object in output".to_string());
    }

    let content: T =
        serde_json::from_str(&raw[start..=end]).map_err(|e| format!("invalid JSON: {}", e))?;
    content.validate()?;
    Ok(content)
}
