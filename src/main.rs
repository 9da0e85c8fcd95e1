// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use docqa_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    language::LanguageGenerator,
    providers::{build_document_parser, build_embedding_provider, build_generation_provider},
    quiz::QuizGenerator,
    rag::{eviction::spawn_idle_sweeper, RagService},
};
use std::env;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("🚀 Starting Document QA Node...\n");
    println!("📦 BUILD VERSION: {}", docqa_node::version::VERSION);
    println!("📅 Build Date: {}", docqa_node::version::BUILD_DATE);
    println!("🧩 Features: {}", docqa_node::version::FEATURES.join(", "));
    println!();
    info!("{}", docqa_node::version::get_version_string());

    let config = NodeConfig::from_env().map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    println!("🔢 Initializing embedding provider...");
    let embedding = build_embedding_provider(&config).await?;
    println!(
        "✅ Embedding provider ready: {} ({:?})",
        embedding.model_name(),
        config.embedding.backend
    );

    println!("🧠 Initializing generation provider...");
    let generator = build_generation_provider(&config)?;
    println!("✅ Generation provider ready: {}", generator.name());

    let rag = RagService::new(&config, build_document_parser(), embedding, generator.clone())?;
    let language = LanguageGenerator::new(
        generator.clone(),
        config.generation_model(),
        config.timeouts.generate(),
    );
    let quiz = QuizGenerator::new(generator, config.timeouts.generate());

    let shutdown = CancellationToken::new();

    let sweeper = match config.idle_ttl() {
        Some(ttl) => {
            println!("🧹 Idle store eviction after {}s", ttl.as_secs());
            Some(spawn_idle_sweeper(
                rag.registry().clone(),
                ttl,
                std::time::Duration::from_secs(config.eviction.interval_secs),
                shutdown.clone(),
            ))
        }
        None => None,
    };

    println!("\n🌐 API server: http://{}", config.bind_address());
    println!("   POST /pdf/process          - ingest a base64 document");
    println!("   GET  /pdf/vector_stores    - list vector stores");
    println!("   POST /qa/answer            - answer a question");
    println!("   POST /quiz/generate        - generate a quiz");
    println!("   POST /language/vocabulary  - generate vocabulary for a category");
    println!("\nPress Ctrl+C to stop\n");

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
        signal_token.cancel();
    });

    let state = AppState {
        rag,
        quiz,
        language,
        max_upload_bytes: config.server.max_upload_bytes,
    };
    let result = start_server(state, &config.server, shutdown.clone()).await;

    shutdown.cancel();
    if let Some(handle) = sweeper {
        let _ = handle.await;
    }

    println!("\n👋 Shutting down...");
    result
}
