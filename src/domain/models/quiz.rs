//! Quiz item domain model.
//!
//! A quiz session carries an ordered list of multiple-choice items. Items are
//! answered strictly in order; each item completes on its own once both
//! participants have chosen an option, and the record completes once every
//! item is complete.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{EngineError, EngineResult};

use super::session::ParticipantId;

/// Creation input for one quiz item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItemSpec {
    /// Question text
    pub question: String,
    /// Fixed option set the answers are drawn from
    pub options: Vec<String>,
    /// Canonical option text; answers match it verbatim
    pub correct_answer: String,
}

impl QuizItemSpec {
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options,
            correct_answer: correct_answer.into(),
        }
    }
}

/// One multiple-choice item within a quiz session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    /// Unique identifier within the session
    pub id: Uuid,
    /// Question text
    pub question: String,
    /// Fixed option set
    pub options: Vec<String>,
    /// Canonical answer, always a member of `options`
    pub correct_answer: String,
    /// Per-participant chosen options, hidden until the record reveals
    pub responses: HashMap<ParticipantId, String>,
    /// Whether both participants have answered this item
    pub complete: bool,
}

impl QuizItem {
    /// Build a validated item from its spec.
    pub fn from_spec(spec: QuizItemSpec) -> EngineResult<Self> {
        if spec.question.trim().is_empty() {
            return Err(EngineError::InvalidPrompt(
                "quiz item question cannot be empty".to_string(),
            ));
        }
        if spec.options.len() < 2 {
            return Err(EngineError::InvalidPrompt(format!(
                "quiz item needs at least two options, got {}",
                spec.options.len()
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for option in &spec.options {
            if option.trim().is_empty() {
                return Err(EngineError::InvalidPrompt(
                    "quiz option cannot be empty".to_string(),
                ));
            }
            if !seen.insert(option.as_str()) {
                return Err(EngineError::InvalidPrompt(format!(
                    "duplicate quiz option: {option:?}"
                )));
            }
        }
        if !spec.options.contains(&spec.correct_answer) {
            return Err(EngineError::InvalidPrompt(format!(
                "correct answer {:?} is not in the option set",
                spec.correct_answer
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            question: spec.question,
            options: spec.options,
            correct_answer: spec.correct_answer,
            responses: HashMap::new(),
            complete: false,
        })
    }

    /// Whether `option` is a member of the fixed option set.
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Whether a participant's stored answer matches the canonical answer.
    /// Exact string equality, case-sensitive.
    pub fn answered_correctly(&self, participant_id: ParticipantId) -> bool {
        self.responses
            .get(&participant_id)
            .is_some_and(|a| *a == self.correct_answer)
    }
}
