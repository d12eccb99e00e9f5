//! Session lifecycle service.
//!
//! Owns session creation (including the single-active-session rule), the
//! latest/active pointers, the append-only history, and participant-scoped
//! views. All mutation of an existing record goes through the
//! `RevealCoordinator`, not this service.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::{
    ConversationId, ParticipantId, PromptPayload, SessionId, SessionKind, SessionRecord,
    SessionView,
};
use crate::domain::ports::SessionRepository;

/// Service for creating and reading paired sessions.
pub struct SessionService {
    repo: Arc<dyn SessionRepository>,
}

impl SessionService {
    pub fn new(repo: Arc<dyn SessionRepository>) -> Self {
        Self { repo }
    }

    /// Register the two participants of a conversation. Sessions created for
    /// the conversation copy these ids at creation and never change them.
    #[instrument(skip(self), fields(%conversation_id), err)]
    pub async fn register_conversation(
        &self,
        conversation_id: ConversationId,
        participants: [ParticipantId; 2],
    ) -> EngineResult<()> {
        self.repo
            .register_conversation(conversation_id, participants)
            .await
    }

    /// Start a new session of `kind` for a conversation.
    ///
    /// Within a conversation, each kind has at most one non-terminal record
    /// at a time: starting a new one is only permitted once the previous
    /// record of that kind is revealed. The repository enforces this
    /// atomically at create, so racing starts resolve to exactly one winner
    /// and one `DuplicateActiveSession`.
    #[instrument(skip(self, payload), fields(%conversation_id, %kind), err)]
    pub async fn start_session(
        &self,
        conversation_id: ConversationId,
        kind: SessionKind,
        payload: PromptPayload,
    ) -> EngineResult<SessionRecord> {
        let participants = self
            .repo
            .participants(conversation_id)
            .await?
            .ok_or(EngineError::ConversationNotFound(conversation_id))?;

        let record = SessionRecord::new(conversation_id, kind, participants, payload)?;
        self.repo.create(record.clone()).await?;
        info!(session_id = %record.id, "session started");
        Ok(record)
    }

    /// Most recently created record of `kind`, regardless of state. Callers
    /// branch on `state` to decide between a compose form and a reveal view.
    pub async fn latest(
        &self,
        conversation_id: ConversationId,
        kind: SessionKind,
    ) -> EngineResult<Option<SessionRecord>> {
        self.repo.latest(conversation_id, kind).await
    }

    /// The currently pending record of `kind`, or `NoActiveSession`.
    pub async fn active(
        &self,
        conversation_id: ConversationId,
        kind: SessionKind,
    ) -> EngineResult<SessionRecord> {
        match self.repo.latest(conversation_id, kind).await? {
            Some(record) if !record.is_terminal() => Ok(record),
            _ => Err(EngineError::NoActiveSession { kind }),
        }
    }

    /// Append-only audit trail of all records of `kind`, in creation order.
    pub async fn history(
        &self,
        conversation_id: ConversationId,
        kind: SessionKind,
    ) -> EngineResult<Vec<SessionRecord>> {
        self.repo.history(conversation_id, kind).await
    }

    /// A session snapshot redacted for one participant. While the record is
    /// pending the caller never sees the partner's stored answer.
    pub async fn view(
        &self,
        session_id: SessionId,
        caller: ParticipantId,
    ) -> EngineResult<SessionView> {
        let record = self
            .repo
            .get(session_id)
            .await?
            .ok_or(EngineError::SessionNotFound(session_id))?;
        SessionView::for_participant(&record, caller)
    }
}
