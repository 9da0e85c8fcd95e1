// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::config::NodeConfig;
use crate::providers::{build_document_parser, build_embedding_provider, build_generation_provider};
use crate::rag::chunker::{self, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::rag::RagService;

/// Arguments for the chunk command
#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// Document to split (PDF or UTF-8 text)
    #[arg(long)]
    pub file: PathBuf,

    /// Window size in characters
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Characters shared by consecutive windows
    #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
    pub overlap: usize,

    /// Print every chunk, not just the summary
    #[arg(long)]
    pub verbose: bool,
}

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Document to ingest (PDF or UTF-8 text)
    #[arg(long)]
    pub file: PathBuf,

    /// Question to answer from the document
    #[arg(long)]
    pub question: String,

    /// Answer language (ar or en)
    #[arg(long, default_value = "ar")]
    pub language: String,

    /// Number of chunks used as grounding context
    #[arg(long)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ChunkStats {
    file: String,
    pages: usize,
    characters: usize,
    chunk_count: usize,
    chunk_size: usize,
    overlap: usize,
    min_chunk_chars: usize,
    max_chunk_chars: usize,
}

/// Parse and chunk a document, printing statistics as JSON
pub async fn chunk_document(args: ChunkArgs) -> Result<()> {
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let parser = build_document_parser();
    let document = parser
        .parse(&bytes)
        .await
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;
    let text = document.text();

    let chunks = chunker::split(&text, args.chunk_size, args.overlap)?;
    let sizes: Vec<usize> = chunks.iter().map(|c| c.text.chars().count()).collect();

    let stats = ChunkStats {
        file: args.file.display().to_string(),
        pages: document.page_count(),
        characters: text.chars().count(),
        chunk_count: chunks.len(),
        chunk_size: args.chunk_size,
        overlap: args.overlap,
        min_chunk_chars: sizes.iter().copied().min().unwrap_or(0),
        max_chunk_chars: sizes.iter().copied().max().unwrap_or(0),
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);

    if args.verbose {
        for chunk in &chunks {
            println!("--- chunk {} ---\n{}", chunk.sequence_index, chunk.text);
        }
    }
    Ok(())
}

/// Ingest a document in-process and answer one question, printing JSON
pub async fn ask_document(args: AskArgs) -> Result<()> {
    let mut config = NodeConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    if let Some(top_k) = args.top_k {
        config.retrieval.top_k = top_k;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
    }

    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let source_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().to_string());

    let service = RagService::new(
        &config,
        build_document_parser(),
        build_embedding_provider(&config).await?,
        build_generation_provider(&config)?,
    )?;

    let store_id = service
        .ingest(bytes, source_name)
        .await
        .context("Document ingestion failed")?;
    info!(store_id = %store_id, "Document ingested");

    let answer = service
        .answer(&store_id, &args.question, &args.language)
        .await
        .context("Answering failed")?;
    println!("{}", serde_json::to_string_pretty(&answer)?);
    Ok(())
}
