//! Participant-scoped session snapshots.
//!
//! The visibility rule lives here: a view served to participant A never
//! contains participant B's stored answer while the record is `Pending`,
//! even though the value already exists in storage. Scores and commentary
//! appear only once the record is `Revealed`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{EngineError, EngineResult};

use super::quiz::QuizItem;
use super::session::{
    ConversationId, ParticipantId, SessionId, SessionKind, SessionPrompt, SessionRecord,
    SessionState,
};

/// Redacted view of one quiz item for one caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItemView {
    pub item_id: Uuid,
    pub question: String,
    pub options: Vec<String>,
    /// The caller's own stored answer
    pub my_answer: Option<String>,
    /// The partner's answer, present only once the record has completed
    pub partner_answer: Option<String>,
    /// Whether the partner has answered (safe to show while hidden)
    pub partner_answered: bool,
    pub complete: bool,
    /// Canonical answer, present only once the record is revealed
    pub correct_answer: Option<String>,
}

/// Snapshot of a session redacted for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub conversation_id: ConversationId,
    pub kind: SessionKind,
    pub state: SessionState,
    /// Shared question for single-question kinds
    pub question: Option<String>,
    /// Items for quiz sessions
    pub items: Vec<QuizItemView>,
    /// The caller's own stored answer (single-question kinds)
    pub my_response: Option<String>,
    /// The partner's answer, present only once the record has completed
    pub partner_response: Option<String>,
    /// Whether the partner has answered (safe to show while hidden)
    pub partner_responded: bool,
    /// Quiz totals, present only once the record is revealed
    pub scores: Option<HashMap<ParticipantId, u32>>,
    /// Derived commentary, present only once revealed and attached
    pub insight: Option<String>,
    /// Whether the commentary is canned fallback text
    pub insight_is_fallback: bool,
    pub created_at: DateTime<Utc>,
    pub revealed_at: Option<DateTime<Utc>>,
}

impl SessionView {
    /// Build the view of `record` as seen by `caller`.
    pub fn for_participant(
        record: &SessionRecord,
        caller: ParticipantId,
    ) -> EngineResult<Self> {
        let partner = record
            .partner_of(caller)
            .ok_or(EngineError::UnknownParticipant {
                session_id: record.id,
                participant_id: caller,
            })?;

        // Completed and revealed records expose both answers; pending ones
        // expose only the caller's own.
        let mutual = record.state != SessionState::Pending;
        let revealed = record.state == SessionState::Revealed;

        let (question, items) = match &record.prompt {
            SessionPrompt::Single { question } => (Some(question.clone()), Vec::new()),
            SessionPrompt::Quiz { items } => (
                None,
                items
                    .iter()
                    .map(|i| item_view(i, caller, partner, mutual, revealed))
                    .collect(),
            ),
        };

        let insight = record
            .insight
            .as_ref()
            .filter(|_| revealed)
            .map(|a| a.text.clone());
        let insight_is_fallback = record
            .insight
            .as_ref()
            .filter(|_| revealed)
            .is_some_and(|a| a.fallback);

        Ok(Self {
            session_id: record.id,
            conversation_id: record.conversation_id,
            kind: record.kind,
            state: record.state,
            question,
            items,
            my_response: record.responses.get(&caller).cloned(),
            partner_response: if mutual {
                record.responses.get(&partner).cloned()
            } else {
                None
            },
            partner_responded: record
                .responses
                .get(&partner)
                .is_some_and(|a| !a.trim().is_empty()),
            scores: if revealed { record.scores.clone() } else { None },
            insight,
            insight_is_fallback,
            created_at: record.created_at,
            revealed_at: record.revealed_at,
        })
    }
}

fn item_view(
    item: &QuizItem,
    caller: ParticipantId,
    partner: ParticipantId,
    mutual: bool,
    revealed: bool,
) -> QuizItemView {
    QuizItemView {
        item_id: item.id,
        question: item.question.clone(),
        options: item.options.clone(),
        my_answer: item.responses.get(&caller).cloned(),
        partner_answer: if mutual {
            item.responses.get(&partner).cloned()
        } else {
            None
        },
        partner_answered: item.responses.contains_key(&partner),
        complete: item.complete,
        correct_answer: revealed.then(|| item.correct_answer.clone()),
    }
}
