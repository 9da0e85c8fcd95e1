// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Arabic language quiz generation

pub mod generator;
pub mod types;

pub use generator::{parse_questions, QuizGenerator};
pub use types::{Difficulty, QuizQuestion, QuizRequest, QUIZ_TYPES};
