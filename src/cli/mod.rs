// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Document QA CLI
#[derive(Parser, Debug)]
#[command(name = "docqa-cli")]
#[command(version)]
#[command(about = "Local document chunking and question answering", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a document into chunks and print statistics
    Chunk(commands::ChunkArgs),

    /// Ingest a document and answer a question about it
    Ask(commands::AskArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Chunk(args) => commands::chunk_document(args).await,
        Commands::Ask(args) => commands::ask_document(args).await,
    }
}
