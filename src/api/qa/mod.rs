// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Question Answering API Module

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{
    answer_handler, qa_health_handler, store_details_handler, supported_languages_handler,
};
pub use request::AnswerRequest;
pub use response::{AnswerResponse, StoreDetailsResponse, SupportedLanguagesResponse};
