// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Quiz Generation API Module

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{
    difficulty_levels_handler, generate_quiz_handler, quiz_health_handler, quiz_types_handler,
};
pub use request::GenerateQuizRequest;
pub use response::{
    DifficultyLevelsResponse, GenerateQuizResponse, QuizHealthResponse, QuizTypesResponse,
};
