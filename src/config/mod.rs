// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration loaded from environment variables

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::providers::watsonx::{WatsonxConfig, DEFAULT_WATSONX_MODEL_ID, DEFAULT_WATSONX_URL};
use crate::providers::openai::DEFAULT_OPENAI_BASE_URL;
use crate::rag::chunker::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 4000;
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 384;
pub const DEFAULT_EMBEDDING_BATCH_SIZE: usize = 32;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_EVICTION_INTERVAL_SECS: u64 = 60;

/// Which embedding provider to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingBackend {
    #[default]
    Hashing,
    OpenAi,
    Onnx,
}

impl EmbeddingBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "hashing" => Some(Self::Hashing),
            "openai" => Some(Self::OpenAi),
            "onnx" => Some(Self::Onnx),
            _ => None,
        }
    }

    /// Model identity recorded on indexes built with this backend
    ///
    /// The hashing embedder has no named model, so `EMBEDDING_MODEL` is ignored
    /// and the identity is derived from the dimension.
    fn model_name(&self, configured: Option<String>, dimension: usize) -> String {
        match self {
            Self::Hashing => format!("hashing-{}", dimension),
            Self::OpenAi => configured.unwrap_or_else(|| "text-embedding-3-small".to_string()),
            Self::Onnx => configured.unwrap_or_else(|| "all-MiniLM-L6-v2".to_string()),
        }
    }
}

/// Which generation provider to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationBackend {
    #[default]
    Watsonx,
    OpenAi,
}

impl GenerationBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "watsonx" => Some(Self::Watsonx),
            "openai" => Some(Self::OpenAi),
            _ => None,
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CORS origins; `*` allows any
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

/// Chunking and retrieval settings
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub max_context_chars: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub model: String,
    pub dimension: usize,
    pub batch_size: usize,
    pub onnx_model_path: Option<PathBuf>,
    pub onnx_tokenizer_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub backend: GenerationBackend,
    /// Model for the OpenAI-compatible backend (watsonx uses `WATSONX_MODEL_ID`)
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

/// Per-stage provider time bounds, in seconds
#[derive(Debug, Clone, PartialEq)]
pub struct TimeoutConfig {
    pub parse_secs: u64,
    pub embed_secs: u64,
    pub generate_secs: u64,
}

impl TimeoutConfig {
    pub fn parse(&self) -> Duration {
        Duration::from_secs(self.parse_secs)
    }

    pub fn embed(&self) -> Duration {
        Duration::from_secs(self.embed_secs)
    }

    pub fn generate(&self) -> Duration {
        Duration::from_secs(self.generate_secs)
    }
}

/// Idle store eviction; disabled when `idle_ttl_secs` is `None`
#[derive(Debug, Clone, PartialEq)]
pub struct EvictionConfig {
    pub idle_ttl_secs: Option<u64>,
    pub interval_secs: u64,
}

/// Complete node configuration
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub server: ServerConfig,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub watsonx: WatsonxConfig,
    pub openai: OpenAiConfig,
    pub timeouts: TimeoutConfig,
    pub eviction: EvictionConfig,
}

impl NodeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parse_or = |key: &str, default: u64| -> Result<u64, String> {
            match get(key) {
                Some(v) => v
                    .trim()
                    .parse()
                    .map_err(|_| format!("{} must be a non-negative integer, got '{}'", key, v)),
                None => Ok(default),
            }
        };

        let embedding_backend = match get("EMBEDDING_PROVIDER") {
            Some(v) => EmbeddingBackend::parse(&v)
                .ok_or_else(|| format!("Unknown EMBEDDING_PROVIDER '{}'", v))?,
            None => EmbeddingBackend::default(),
        };
        let generation_backend = match get("GENERATION_PROVIDER") {
            Some(v) => GenerationBackend::parse(&v)
                .ok_or_else(|| format!("Unknown GENERATION_PROVIDER '{}'", v))?,
            None => GenerationBackend::default(),
        };

        let port = parse_or("PORT", DEFAULT_PORT as u64)?;
        let port = u16::try_from(port).map_err(|_| format!("PORT out of range: {}", port))?;

        let embedding_dimension =
            parse_or("EMBEDDING_DIMENSION", DEFAULT_EMBEDDING_DIMENSION as u64)? as usize;

        let idle_ttl_secs = match get("STORE_IDLE_TTL_SECS") {
            Some(_) => Some(parse_or("STORE_IDLE_TTL_SECS", 0)?),
            None => None,
        };

        let config = Self {
            server: ServerConfig {
                host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
                allowed_origins: get("ALLOWED_ORIGINS")
                    .map(|v| {
                        v.split(',')
                            .map(|origin| origin.trim().to_string())
                            .filter(|origin| !origin.is_empty())
                            .collect()
                    })
                    .unwrap_or_else(|| vec!["*".to_string()]),
                max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES as u64)?
                    as usize,
            },
            retrieval: RetrievalConfig {
                chunk_size: parse_or("CHUNK_SIZE", DEFAULT_CHUNK_SIZE as u64)? as usize,
                chunk_overlap: parse_or("CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP as u64)? as usize,
                top_k: parse_or("QA_TOP_K", DEFAULT_TOP_K as u64)? as usize,
                max_context_chars: parse_or("MAX_CONTEXT_CHARS", DEFAULT_MAX_CONTEXT_CHARS as u64)?
                    as usize,
            },
            embedding: EmbeddingConfig {
                backend: embedding_backend,
                model: embedding_backend.model_name(get("EMBEDDING_MODEL"), embedding_dimension),
                dimension: embedding_dimension,
                batch_size: parse_or("EMBEDDING_BATCH_SIZE", DEFAULT_EMBEDDING_BATCH_SIZE as u64)?
                    as usize,
                onnx_model_path: get("ONNX_MODEL_PATH").map(PathBuf::from),
                onnx_tokenizer_path: get("ONNX_TOKENIZER_PATH").map(PathBuf::from),
            },
            generation: GenerationConfig {
                backend: generation_backend,
                model: get("GENERATION_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            },
            watsonx: WatsonxConfig {
                api_key: get("IBM_WATSONX_API_KEY"),
                project_id: get("IBM_WATSONX_PROJECT_ID"),
                url: get("IBM_WATSONX_URL").unwrap_or_else(|| DEFAULT_WATSONX_URL.to_string()),
                model_id: get("WATSONX_MODEL_ID")
                    .unwrap_or_else(|| DEFAULT_WATSONX_MODEL_ID.to_string()),
                ..WatsonxConfig::default()
            },
            openai: OpenAiConfig {
                api_key: get("OPENAI_API_KEY"),
                base_url: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            },
            timeouts: TimeoutConfig {
                parse_secs: parse_or("PARSE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
                embed_secs: parse_or("EMBED_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
                generate_secs: parse_or("GENERATE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            },
            eviction: EvictionConfig {
                idle_ttl_secs,
                interval_secs: parse_or("EVICTION_INTERVAL_SECS", DEFAULT_EVICTION_INTERVAL_SECS)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.retrieval.chunk_size == 0 {
            return Err("CHUNK_SIZE must be greater than 0".to_string());
        }
        if self.retrieval.chunk_overlap >= self.retrieval.chunk_size {
            return Err("CHUNK_OVERLAP must be smaller than CHUNK_SIZE".to_string());
        }
        if self.retrieval.top_k == 0 {
            return Err("QA_TOP_K must be greater than 0".to_string());
        }
        if self.retrieval.max_context_chars == 0 {
            return Err("MAX_CONTEXT_CHARS must be greater than 0".to_string());
        }
        if self.embedding.dimension == 0 {
            return Err("EMBEDDING_DIMENSION must be greater than 0".to_string());
        }
        if self.embedding.batch_size == 0 {
            return Err("EMBEDDING_BATCH_SIZE must be greater than 0".to_string());
        }
        if self.timeouts.parse_secs == 0
            || self.timeouts.embed_secs == 0
            || self.timeouts.generate_secs == 0
        {
            return Err("Provider timeouts must be greater than 0".to_string());
        }
        if self.eviction.idle_ttl_secs == Some(0) {
            return Err("STORE_IDLE_TTL_SECS must be greater than 0 when set".to_string());
        }
        if self.eviction.interval_secs == 0 {
            return Err("EVICTION_INTERVAL_SECS must be greater than 0".to_string());
        }
        if self.server.max_upload_bytes == 0 {
            return Err("MAX_UPLOAD_BYTES must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn idle_ttl(&self) -> Option<Duration> {
        self.eviction.idle_ttl_secs.map(Duration::from_secs)
    }

    /// Model id used by the selected generation backend
    pub fn generation_model(&self) -> &str {
        match self.generation.backend {
            GenerationBackend::Watsonx => &self.watsonx.model_id,
            GenerationBackend::OpenAi => &self.generation.model,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
                allowed_origins: vec!["*".to_string()],
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            retrieval: RetrievalConfig {
                chunk_size: DEFAULT_CHUNK_SIZE,
                chunk_overlap: DEFAULT_CHUNK_OVERLAP,
                top_k: DEFAULT_TOP_K,
                max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            },
            embedding: EmbeddingConfig {
                backend: EmbeddingBackend::Hashing,
                model: EmbeddingBackend::Hashing.model_name(None, DEFAULT_EMBEDDING_DIMENSION),
                dimension: DEFAULT_EMBEDDING_DIMENSION,
                batch_size: DEFAULT_EMBEDDING_BATCH_SIZE,
                onnx_model_path: None,
                onnx_tokenizer_path: None,
            },
            generation: GenerationConfig {
                backend: GenerationBackend::Watsonx,
                model: "gpt-4o-mini".to_string(),
            },
            watsonx: WatsonxConfig::default(),
            openai: OpenAiConfig {
                api_key: None,
                base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            },
            timeouts: TimeoutConfig {
                parse_secs: DEFAULT_TIMEOUT_SECS,
                embed_secs: DEFAULT_TIMEOUT_SECS,
                generate_secs: DEFAULT_TIMEOUT_SECS,
            },
            eviction: EvictionConfig {
                idle_ttl_secs: None,
                interval_secs: DEFAULT_EVICTION_INTERVAL_SECS,
            },
        }
    }
}
