// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod http_server;
pub mod language;
pub mod pdf;
pub mod qa;
pub mod quiz;

pub use errors::{ApiError, ErrorResponse};
pub use http_server::{build_router, start_server, AppState, HealthResponse, RootResponse};
