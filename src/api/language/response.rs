// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response types for the /language endpoints
//!
//! Generated content is returned as the typed values from `crate::language`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfoResponse {
    /// Model id the generation backend was configured with
    pub model: String,
    /// Generation backend name
    pub provider: String,
}
