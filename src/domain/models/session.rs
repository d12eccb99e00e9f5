//! Session domain model.
//!
//! A session is one instance of a paired question-and-answer exchange between
//! exactly two participants. Answers stay hidden from the other participant
//! until both have answered, then the record is revealed atomically.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{EngineError, EngineResult};

use super::insight::InsightArtifact;
use super::quiz::{QuizItem, QuizItemSpec};

/// Identifier of the conversation that owns a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a participant in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub Uuid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of paired exchange. Fixed at creation, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Single shared question, revealed immediately on completion.
    CheckIn,
    /// Single shared question; commentary is attached before the reveal.
    JournalPrompt,
    /// Ordered list of multiple-choice items, scored at completion.
    Quiz,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "check_in",
            Self::JournalPrompt => "journal_prompt",
            Self::Quiz => "quiz",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "check_in" | "checkin" => Some(Self::CheckIn),
            "journal_prompt" | "journal" => Some(Self::JournalPrompt),
            "quiz" => Some(Self::Quiz),
            _ => None,
        }
    }

    /// Whether the insight call must settle before the record flips to
    /// `Revealed`. Check-ins reveal first and attach commentary afterwards;
    /// journals and quizzes hold the reveal until the call settles.
    pub fn insight_before_reveal(&self) -> bool {
        matches!(self, Self::JournalPrompt | Self::Quiz)
    }

    /// Whether scores are computed at completion.
    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Quiz)
    }

    /// Whether a participant may re-roll the derived commentary after the
    /// reveal. Regeneration replaces the artifact, never the record.
    pub fn supports_regeneration(&self) -> bool {
        matches!(self, Self::JournalPrompt)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a session record.
///
/// The state is monotonic: `Pending -> Completed -> Revealed`. No transition
/// reverses or skips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for both participants to answer.
    #[default]
    Pending,
    /// Both required answers are present; scoring has run if applicable.
    Completed,
    /// Answers are mutually visible and commentary is attached. Terminal.
    Revealed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Revealed => "revealed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" | "complete" => Some(Self::Completed),
            "revealed" => Some(Self::Revealed),
            _ => None,
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revealed)
    }

    /// Valid transitions from this state.
    pub fn valid_transitions(&self) -> Vec<SessionState> {
        match self {
            Self::Pending => vec![Self::Completed],
            Self::Completed => vec![Self::Revealed],
            Self::Revealed => vec![],
        }
    }

    pub fn can_transition_to(&self, new_state: Self) -> bool {
        self.valid_transitions().contains(&new_state)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation input for a session: a single question or a list of quiz items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "payload", rename_all = "snake_case")]
pub enum PromptPayload {
    Single { question: String },
    Quiz { items: Vec<QuizItemSpec> },
}

/// Prompt content stored on a session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "prompt", rename_all = "snake_case")]
pub enum SessionPrompt {
    Single { question: String },
    Quiz { items: Vec<QuizItem> },
}

/// One instance of a paired exchange between two participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique identifier
    pub id: SessionId,
    /// Owning conversation
    pub conversation_id: ConversationId,
    /// Exchange kind, fixed at creation
    pub kind: SessionKind,
    /// Exactly two distinct members, fixed at creation
    pub participants: [ParticipantId; 2],
    /// Current lifecycle state
    pub state: SessionState,
    /// The question(s) asked of both participants
    pub prompt: SessionPrompt,
    /// Stored answers for single-question kinds. Values exist as soon as they
    /// are submitted but are hidden from the other participant until the
    /// record reaches `Completed`.
    pub responses: HashMap<ParticipantId, String>,
    /// Per-participant totals, computed once at completion (quiz only)
    pub scores: Option<HashMap<ParticipantId, u32>>,
    /// Derived commentary attached after the reveal decision point
    pub insight: Option<InsightArtifact>,
    /// Generation counter for regenerable commentary; a result tagged with a
    /// stale generation is discarded on write-back
    pub insight_generation: u32,
    /// When created (ordering key within a conversation)
    pub created_at: DateTime<Utc>,
    /// When last updated
    pub updated_at: DateTime<Utc>,
    /// When the record became mutually visible
    pub revealed_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Create a new pending session for a conversation.
    ///
    /// Fails if the participants are not distinct, if the payload does not
    /// match the kind, or if the payload itself is invalid (empty question,
    /// malformed quiz items).
    pub fn new(
        conversation_id: ConversationId,
        kind: SessionKind,
        participants: [ParticipantId; 2],
        payload: PromptPayload,
    ) -> EngineResult<Self> {
        if participants[0] == participants[1] {
            return Err(EngineError::ValidationFailed(
                "session requires two distinct participants".to_string(),
            ));
        }

        let prompt = match (kind, payload) {
            (SessionKind::CheckIn | SessionKind::JournalPrompt, PromptPayload::Single { question }) => {
                if question.trim().is_empty() {
                    return Err(EngineError::InvalidPrompt(
                        "question cannot be empty".to_string(),
                    ));
                }
                SessionPrompt::Single { question }
            }
            (SessionKind::Quiz, PromptPayload::Quiz { items }) => {
                if items.is_empty() {
                    return Err(EngineError::InvalidPrompt(
                        "quiz requires at least one item".to_string(),
                    ));
                }
                let items = items
                    .into_iter()
                    .map(QuizItem::from_spec)
                    .collect::<EngineResult<Vec<_>>>()?;
                SessionPrompt::Quiz { items }
            }
            (kind, _) => {
                return Err(EngineError::InvalidPrompt(format!(
                    "payload does not match session kind {kind}"
                )));
            }
        };

        let now = Utc::now();
        Ok(Self {
            id: SessionId::new(),
            conversation_id,
            kind,
            participants,
            state: SessionState::default(),
            prompt,
            responses: HashMap::new(),
            scores: None,
            insight: None,
            insight_generation: 0,
            created_at: now,
            updated_at: now,
            revealed_at: None,
        })
    }

    /// Check membership.
    pub fn is_participant(&self, participant_id: ParticipantId) -> bool {
        self.participants.contains(&participant_id)
    }

    /// The other member of the pair, if `participant_id` is a member.
    pub fn partner_of(&self, participant_id: ParticipantId) -> Option<ParticipantId> {
        if self.participants[0] == participant_id {
            Some(self.participants[1])
        } else if self.participants[1] == participant_id {
            Some(self.participants[0])
        } else {
            None
        }
    }

    /// Quiz items, if this is a quiz session.
    pub fn items(&self) -> Option<&[QuizItem]> {
        match &self.prompt {
            SessionPrompt::Quiz { items } => Some(items),
            SessionPrompt::Single { .. } => None,
        }
    }

    fn items_mut(&mut self) -> Option<&mut Vec<QuizItem>> {
        match &mut self.prompt {
            SessionPrompt::Quiz { items } => Some(items),
            SessionPrompt::Single { .. } => None,
        }
    }

    /// The first incomplete quiz item, which is the only one accepting answers.
    pub fn current_item(&self) -> Option<&QuizItem> {
        self.items().and_then(|items| items.iter().find(|i| !i.complete))
    }

    /// Store an answer for a single-question session. Last write wins until
    /// the record completes.
    pub fn record_response(
        &mut self,
        participant_id: ParticipantId,
        answer: String,
    ) -> EngineResult<()> {
        if self.kind == SessionKind::Quiz {
            return Err(EngineError::UnsupportedForKind {
                kind: self.kind,
                operation: "submit_response",
            });
        }
        if !self.is_participant(participant_id) {
            return Err(EngineError::UnknownParticipant {
                session_id: self.id,
                participant_id,
            });
        }
        if self.state != SessionState::Pending {
            return Err(EngineError::SessionClosed {
                session_id: self.id,
                state: self.state,
            });
        }
        if answer.trim().is_empty() {
            return Err(EngineError::EmptyAnswer);
        }
        self.responses.insert(participant_id, answer);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Store a quiz answer for the current item.
    ///
    /// Returns `true` when this answer completed the item. Answers against an
    /// already-complete item fail with `SessionClosed`; answers against a
    /// later item fail with `ItemOutOfTurn`.
    pub fn record_quiz_answer(
        &mut self,
        participant_id: ParticipantId,
        item_id: Uuid,
        chosen_option: &str,
    ) -> EngineResult<bool> {
        if self.kind != SessionKind::Quiz {
            return Err(EngineError::UnsupportedForKind {
                kind: self.kind,
                operation: "answer_quiz_item",
            });
        }
        if !self.is_participant(participant_id) {
            return Err(EngineError::UnknownParticipant {
                session_id: self.id,
                participant_id,
            });
        }
        if self.state != SessionState::Pending {
            return Err(EngineError::SessionClosed {
                session_id: self.id,
                state: self.state,
            });
        }

        let session_id = self.id;
        let state = self.state;
        let participants = self.participants;
        let current_id = self.current_item().map(|i| i.id);
        let items = self
            .items_mut()
            .ok_or(EngineError::ItemNotFound { session_id, item_id })?;

        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(EngineError::ItemNotFound { session_id, item_id })?;

        if item.complete {
            return Err(EngineError::SessionClosed { session_id, state });
        }
        if current_id != Some(item_id) {
            return Err(EngineError::ItemOutOfTurn { item_id });
        }
        if !item.has_option(chosen_option) {
            return Err(EngineError::InvalidOption {
                item_id,
                option: chosen_option.to_string(),
            });
        }

        item.responses
            .insert(participant_id, chosen_option.to_string());
        let finished = participants
            .iter()
            .all(|p| item.responses.get(p).is_some_and(|a| !a.trim().is_empty()));
        if finished {
            item.complete = true;
        }
        self.updated_at = Utc::now();
        Ok(finished)
    }

    /// Completion predicate for the record as a whole: both participants have
    /// a non-empty answer for every unit of work.
    pub fn responses_complete(&self) -> bool {
        match &self.prompt {
            SessionPrompt::Single { .. } => self.participants.iter().all(|p| {
                self.responses
                    .get(p)
                    .is_some_and(|a| !a.trim().is_empty())
            }),
            SessionPrompt::Quiz { items } => items.iter().all(|i| i.complete),
        }
    }

    /// Transition to a new state, rejecting anything outside the monotonic
    /// `Pending -> Completed -> Revealed` chain.
    pub fn transition_to(&mut self, new_state: SessionState) -> EngineResult<()> {
        if !self.state.can_transition_to(new_state) {
            return Err(EngineError::InvalidStateTransition {
                from: self.state,
                to: new_state,
            });
        }
        self.state = new_state;
        self.updated_at = Utc::now();
        if new_state == SessionState::Revealed {
            self.revealed_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Record quiz totals. Computed once; later calls are ignored.
    pub fn set_scores(&mut self, scores: HashMap<ParticipantId, u32>) {
        if self.scores.is_none() {
            self.scores = Some(scores);
            self.updated_at = Utc::now();
        }
    }

    /// Attach derived commentary. Stale generations are discarded.
    ///
    /// Returns `true` if the artifact was accepted.
    pub fn attach_insight(&mut self, artifact: InsightArtifact) -> bool {
        if artifact.generation != self.insight_generation {
            return false;
        }
        self.insight = Some(artifact);
        self.updated_at = Utc::now();
        true
    }

    /// Bump the commentary generation ahead of a re-roll.
    pub fn bump_insight_generation(&mut self) -> u32 {
        self.insight_generation += 1;
        self.updated_at = Utc::now();
        self.insight_generation
    }

    /// Check if the record is terminal.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
