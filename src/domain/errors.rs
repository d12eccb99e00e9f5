//! Domain errors for the Tandem disclosure engine.

use thiserror::Error;
use uuid::Uuid;

use super::models::session::{ConversationId, ParticipantId, SessionId, SessionKind, SessionState};

/// Domain-level errors that can occur in the Tandem engine.
///
/// Participant-input errors (`UnknownParticipant`, `SessionClosed`,
/// `DuplicateActiveSession`, ...) are returned synchronously to the caller
/// for UI display. Insight-generation failures are recovered inside the
/// engine via fallback commentary and never appear here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    #[error("Participant {participant_id} is not a member of session {session_id}")]
    UnknownParticipant {
        session_id: SessionId,
        participant_id: ParticipantId,
    },

    #[error("Session {session_id} no longer accepts answers (state: {state})")]
    SessionClosed {
        session_id: SessionId,
        state: SessionState,
    },

    #[error("No active {kind} session for this conversation")]
    NoActiveSession { kind: SessionKind },

    #[error("Conversation {conversation_id} already has an active {kind} session")]
    DuplicateActiveSession {
        conversation_id: ConversationId,
        kind: SessionKind,
    },

    #[error("Quiz item not found in session {session_id}: {item_id}")]
    ItemNotFound { session_id: SessionId, item_id: Uuid },

    #[error("Quiz item {item_id} is not the current item")]
    ItemOutOfTurn { item_id: Uuid },

    #[error("Option {option:?} is not in the option set of item {item_id}")]
    InvalidOption { item_id: Uuid, option: String },

    #[error("Answer cannot be empty")]
    EmptyAnswer,

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: SessionState, to: SessionState },

    #[error("Invalid prompt payload: {0}")]
    InvalidPrompt(String),

    #[error("Operation not supported for {kind} sessions: {operation}")]
    UnsupportedForKind {
        kind: SessionKind,
        operation: &'static str,
    },

    #[error("{kind} sessions do not support insight regeneration")]
    RegenerationUnsupported { kind: SessionKind },

    #[error("Session {0} has not been revealed yet")]
    SessionNotRevealed(SessionId),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
