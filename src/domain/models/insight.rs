//! Derived-insight domain model.
//!
//! After a reveal the engine asks an external collaborator for commentary on
//! the exchange. The request carries the prompt and both answers; the result
//! is attached to the session as an artifact tagged with a generation counter
//! so a late-arriving result for a superseded re-roll is discarded.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quiz::QuizItem;
use super::session::{ParticipantId, SessionId, SessionKind, SessionPrompt, SessionRecord};

/// One question together with both participants' answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightExchange {
    pub question: String,
    pub answers: HashMap<ParticipantId, String>,
}

/// Snapshot of a completed session sent to the insight generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRequest {
    pub session_id: SessionId,
    pub kind: SessionKind,
    /// Generation this request was issued for
    pub generation: u32,
    pub exchanges: Vec<InsightExchange>,
    /// Quiz totals, present once scoring has run
    pub scores: Option<HashMap<ParticipantId, u32>>,
}

impl InsightRequest {
    /// Build a request from a completed session record.
    pub fn from_record(record: &SessionRecord) -> Self {
        let exchanges = match &record.prompt {
            SessionPrompt::Single { question } => vec![InsightExchange {
                question: question.clone(),
                answers: record.responses.clone(),
            }],
            SessionPrompt::Quiz { items } => items.iter().map(item_exchange).collect(),
        };
        Self {
            session_id: record.id,
            kind: record.kind,
            generation: record.insight_generation,
            exchanges,
            scores: record.scores.clone(),
        }
    }
}

fn item_exchange(item: &QuizItem) -> InsightExchange {
    InsightExchange {
        question: item.question.clone(),
        answers: item.responses.clone(),
    }
}

/// Commentary attached to a session after the reveal decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightArtifact {
    /// Natural-language commentary, never empty
    pub text: String,
    /// Generation counter this artifact belongs to
    pub generation: u32,
    /// Whether this is canned fallback text rather than generated commentary
    pub fallback: bool,
    /// When the artifact was produced
    pub created_at: DateTime<Utc>,
}

impl InsightArtifact {
    /// Commentary returned by the external generator.
    pub fn generated(text: String, generation: u32) -> Self {
        Self {
            text,
            generation,
            fallback: false,
            created_at: Utc::now(),
        }
    }

    /// Canned commentary substituted when generation fails or times out.
    pub fn fallback(text: String, generation: u32) -> Self {
        Self {
            text,
            generation,
            fallback: true,
            created_at: Utc::now(),
        }
    }
}
