// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod language;
pub mod providers;
pub mod quiz;
pub mod rag;
pub mod version;

// Re-export main types
pub use config::NodeConfig;
pub use rag::{Answer, RagError, RagService, StoreRegistry, StoreStatus};
