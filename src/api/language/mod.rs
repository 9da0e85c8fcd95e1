// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Language Content API Module

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{
    cultural_fact_handler, model_info_handler, sentence_handler, story_handler,
    vocabulary_handler,
};
pub use request::VocabularyQuery;
pub use response::ModelInfoResponse;
