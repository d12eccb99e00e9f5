/// Session repository port (trait) for dependency injection.
///
/// Defines the contract for session storage that adapters must implement.
/// Services depend on this trait, not concrete implementations. The
/// repository stores whole-record snapshots; serialization of state-affecting
/// writes is the `RevealCoordinator`'s job, not the repository's.
use async_trait::async_trait;

use crate::domain::errors::EngineResult;
use crate::domain::models::{ConversationId, ParticipantId, SessionId, SessionKind, SessionRecord};

/// Repository trait for session persistence.
///
/// Records are never deleted: superseded records remain as an audit trail,
/// ordered by creation time within each conversation and kind.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Registers the two participants of a conversation. Sessions created
    /// for the conversation copy these ids at creation.
    async fn register_conversation(
        &self,
        conversation_id: ConversationId,
        participants: [ParticipantId; 2],
    ) -> EngineResult<()>;

    /// Looks up the registered participants of a conversation.
    async fn participants(
        &self,
        conversation_id: ConversationId,
    ) -> EngineResult<Option<[ParticipantId; 2]>>;

    /// Persists a new session record.
    ///
    /// Implementations must make the active-session check and the insert a
    /// single atomic step, so a conversation never holds two non-terminal
    /// records of the same kind, even under racing creates.
    ///
    /// # Errors
    /// Returns `Storage` if the session id already exists, and
    /// `DuplicateActiveSession` if a non-terminal record of the same kind
    /// exists for the conversation.
    async fn create(&self, record: SessionRecord) -> EngineResult<()>;

    /// Retrieves a session by id.
    async fn get(&self, session_id: SessionId) -> EngineResult<Option<SessionRecord>>;

    /// Replaces an existing session record with an updated snapshot.
    ///
    /// # Errors
    /// Returns `SessionNotFound` if the record was never created.
    async fn update(&self, record: SessionRecord) -> EngineResult<()>;

    /// Most recently created record of a kind for a conversation, regardless
    /// of state. Callers branch on `state` to decide what to show.
    async fn latest(
        &self,
        conversation_id: ConversationId,
        kind: SessionKind,
    ) -> EngineResult<Option<SessionRecord>>;

    /// All records of a kind for a conversation, in creation order.
    async fn history(
        &self,
        conversation_id: ConversationId,
        kind: SessionKind,
    ) -> EngineResult<Vec<SessionRecord>>;
}
