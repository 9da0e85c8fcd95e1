// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Local sentence-transformer embeddings through ONNX Runtime
//!
//! Built only with `--features onnx`. Expects a BERT-style model that
//! outputs token embeddings `[batch, seq_len, hidden]`; sentence vectors are
//! produced by attention-masked mean pooling.

use anyhow::{Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::Tokenizer;
use tracing::info;

use super::types::ProviderError;
use super::EmbeddingProvider;

#[derive(Clone)]
pub struct OnnxEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    dimension: usize,
}

impl std::fmt::Debug for OnnxEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbedder")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbedder {
    /// Load the model and tokenizer, probing the output dimension
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref().to_path_buf();
        let tokenizer_path = tokenizer_path.as_ref().to_path_buf();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        let (session, tokenizer, dimension) = tokio::task::spawn_blocking(move || -> Result<_> {
            let mut session = Session::builder()
                .context("Failed to create session builder")?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .context("Failed to set CPU execution provider")?
                .with_optimization_level(GraphOptimizationLevel::Level3)
                .context("Failed to set optimization level")?
                .commit_from_file(&model_path)
                .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

            let tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

            let sample = run_batch(&mut session, &tokenizer, &["dimension check".to_string()])?;
            let dimension = sample.first().map(Vec::len).unwrap_or(0);
            if dimension == 0 {
                anyhow::bail!("Model produced an empty embedding");
            }
            Ok((session, tokenizer, dimension))
        })
        .await
        .context("ONNX model loading task failed")??;

        info!(
            "ONNX embedding model {} loaded ({} dimensions)",
            model_name, dimension
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
        })
    }
}

/// Tokenize, pad, run inference and mean-pool one batch
fn run_batch(
    session: &mut Session,
    tokenizer: &Tokenizer,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    let encodings = texts
        .iter()
        .map(|text| {
            tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    let max_len = encodings
        .iter()
        .map(|enc| enc.get_ids().len())
        .max()
        .unwrap_or(0);

    let mut input_ids = Vec::with_capacity(texts.len() * max_len);
    let mut attention_mask = Vec::with_capacity(texts.len() * max_len);
    for encoding in &encodings {
        let ids = encoding.get_ids();
        let padding = max_len - ids.len();
        input_ids.extend(ids.iter().map(|&id| id as i64));
        input_ids.extend(std::iter::repeat(0i64).take(padding));
        attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));
        attention_mask.extend(std::iter::repeat(0i64).take(padding));
    }
    let token_type_ids = vec![0i64; texts.len() * max_len];

    let shape = (texts.len(), max_len);
    let outputs = session.run(ort::inputs![
        "input_ids" => Value::from_array(Array2::from_shape_vec(shape, input_ids)?)?,
        "attention_mask" => Value::from_array(Array2::from_shape_vec(shape, attention_mask.clone())?)?,
        "token_type_ids" => Value::from_array(Array2::from_shape_vec(shape, token_type_ids)?)?
    ])?;

    let output = outputs[0]
        .try_extract_array::<f32>()
        .context("Failed to extract output tensor")?;
    if output.ndim() != 3 {
        anyhow::bail!(
            "Model outputs unexpected shape {:?} (expected [batch, seq_len, hidden])",
            output.shape()
        );
    }

    let mut embeddings = Vec::with_capacity(texts.len());
    for batch_idx in 0..texts.len() {
        let item = output.index_axis(Axis(0), batch_idx);
        let hidden = item.shape()[1];
        let mask = &attention_mask[batch_idx * max_len..(batch_idx + 1) * max_len];

        let mut pooled = vec![0.0f32; hidden];
        let mut mask_sum = 0.0f32;
        for (token, &m) in mask.iter().enumerate() {
            let weight = m as f32;
            mask_sum += weight;
            for (j, value) in pooled.iter_mut().enumerate() {
                *value += item[[token, j]] * weight;
            }
        }
        for value in &mut pooled {
            *value /= mask_sum.max(1e-9);
        }
        embeddings.push(pooled);
    }

    Ok(embeddings)
}

#[async_trait]
impl EmbeddingProvider for OnnxEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut guard = session
                .lock()
                .map_err(|_| ProviderError::Unavailable("ONNX session lock poisoned".to_string()))?;
            run_batch(&mut guard, &tokenizer, &texts)
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
        })
        .await
        .map_err(|e| ProviderError::Unavailable(format!("ONNX inference task failed: {}", e)))?
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}
