// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! IBM watsonx.ai text generation provider
//!
//! Authenticates through the IBM Cloud IAM API-key exchange and caches the
//! bearer token until shortly before it expires.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::types::ProviderError;
use super::GenerationProvider;

pub const DEFAULT_WATSONX_URL: &str = "https://eu-de.ml.cloud.ibm.com";
pub const DEFAULT_WATSONX_MODEL_ID: &str = "sdaia/allam-1-13b-instruct";
const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";
const API_VERSION: &str = "2023-05-29";

/// Tokens are refreshed this long before their reported expiry
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Connection settings and decoding parameters
#[derive(Debug, Clone, PartialEq)]
pub struct WatsonxConfig {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub url: String,
    pub model_id: String,
    pub iam_url: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub repetition_penalty: f32,
}

impl Default for WatsonxConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: None,
            url: DEFAULT_WATSONX_URL.to_string(),
            model_id: DEFAULT_WATSONX_MODEL_ID.to_string(),
            iam_url: IAM_TOKEN_URL.to_string(),
            max_new_tokens: 400,
            temperature: 0.7,
            top_p: 1.0,
            repetition_penalty: 1.0,
        }
    }
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct WatsonxGenerator {
    client: Client,
    config: WatsonxConfig,
    api_key: String,
    project_id: String,
    timeout_ms: u64,
    token: Mutex<Option<CachedToken>>,
}

impl WatsonxGenerator {
    pub fn new(config: WatsonxConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::Unavailable("IBM_WATSONX_API_KEY not set".to_string()))?;
        let project_id = config
            .project_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::Unavailable("IBM_WATSONX_PROJECT_ID not set".to_string())
            })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        info!(
            "watsonx generator configured: model={} url={}",
            config.model_id, config.url
        );

        Ok(Self {
            client,
            config,
            api_key,
            project_id,
            timeout_ms: timeout.as_millis() as u64,
            token: Mutex::new(None),
        })
    }

    fn generation_url(&self) -> String {
        format!(
            "{}/ml/v1/text/generation?version={}",
            self.config.url.trim_end_matches('/'),
            API_VERSION
        )
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .client
            .post(&self.config.iam_url)
            .form(&[
                ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(e, self.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: format!("IAM token exchange failed: {}", message),
            });
        }

        let token: IamTokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("IAM token response: {}", e)))?;

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));
        let expires_at = Instant::now() + lifetime.saturating_sub(TOKEN_REFRESH_MARGIN);
        debug!("Obtained watsonx IAM token valid for {:?}", lifetime);

        let value = token.access_token;
        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at,
        });
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    fn request_body<'a>(&'a self, prompt: &str) -> GenerationRequest<'a> {
        GenerationRequest {
            input: wrap_instruction(prompt),
            parameters: GenerationParameters {
                decoding_method: "greedy",
                max_new_tokens: self.config.max_new_tokens,
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                repetition_penalty: self.config.repetition_penalty,
            },
            model_id: &self.config.model_id,
            project_id: &self.project_id,
        }
    }
}

/// Instruction wrapping expected by the instruct models
pub fn wrap_instruction(prompt: &str) -> String {
    format!("<s> [INST] {} [/INST]", prompt)
}

/// Pull the first generated text out of a generation response
fn extract_generated_text(response: GenerationResponse) -> Result<String, ProviderError> {
    response
        .results
        .into_iter()
        .next()
        .and_then(|result| result.generated_text)
        .ok_or_else(|| {
            ProviderError::InvalidResponse("response had no results[0].generated_text".to_string())
        })
}

#[async_trait]
impl GenerationProvider for WatsonxGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(self.generation_url())
            .bearer_auth(token)
            .header("Accept", "application/json")
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(e, self.timeout_ms))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_token().await;
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("generation response: {}", e)))?;
        extract_generated_text(parsed)
    }

    fn name(&self) -> &str {
        "watsonx"
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    input: String,
    parameters: GenerationParameters,
    model_id: &'a str,
    project_id: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    decoding_method: &'static str,
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    repetition_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    results: Vec<GenerationResult>,
}

#[derive(Debug, Deserialize)]
struct GenerationResult {
    generated_text: Option<String>,
}
