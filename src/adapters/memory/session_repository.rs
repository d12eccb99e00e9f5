//! In-memory session repository.
//!
//! Stores whole-record snapshots behind a tokio `RwLock`. This satisfies the
//! engine's invariants on its own because all state-affecting writes are
//! already serialized per record by the `RevealCoordinator`; the repository
//! only needs consistent snapshots.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::{ConversationId, ParticipantId, SessionId, SessionKind, SessionRecord};
use crate::domain::ports::SessionRepository;

#[derive(Default)]
struct Store {
    sessions: HashMap<SessionId, SessionRecord>,
    /// Creation-ordered session ids per conversation and kind (audit trail)
    by_conversation: HashMap<(ConversationId, SessionKind), Vec<SessionId>>,
    conversations: HashMap<ConversationId, [ParticipantId; 2]>,
}

/// In-memory `SessionRepository` implementation.
#[derive(Default)]
pub struct InMemorySessionRepository {
    store: RwLock<Store>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn register_conversation(
        &self,
        conversation_id: ConversationId,
        participants: [ParticipantId; 2],
    ) -> EngineResult<()> {
        if participants[0] == participants[1] {
            return Err(EngineError::ValidationFailed(
                "conversation requires two distinct participants".to_string(),
            ));
        }
        let mut store = self.store.write().await;
        store.conversations.insert(conversation_id, participants);
        Ok(())
    }

    async fn participants(
        &self,
        conversation_id: ConversationId,
    ) -> EngineResult<Option<[ParticipantId; 2]>> {
        let store = self.store.read().await;
        Ok(store.conversations.get(&conversation_id).copied())
    }

    async fn create(&self, record: SessionRecord) -> EngineResult<()> {
        let mut store = self.store.write().await;
        if store.sessions.contains_key(&record.id) {
            return Err(EngineError::Storage(format!(
                "session {} already exists",
                record.id
            )));
        }
        // Check-and-insert under the same write lock: two racing creates for
        // the same conversation and kind can never both observe no active
        // record.
        let active = store
            .by_conversation
            .get(&(record.conversation_id, record.kind))
            .and_then(|ids| ids.last())
            .and_then(|id| store.sessions.get(id));
        if active.is_some_and(|existing| !existing.is_terminal()) {
            return Err(EngineError::DuplicateActiveSession {
                conversation_id: record.conversation_id,
                kind: record.kind,
            });
        }
        store
            .by_conversation
            .entry((record.conversation_id, record.kind))
            .or_default()
            .push(record.id);
        store.sessions.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, session_id: SessionId) -> EngineResult<Option<SessionRecord>> {
        let store = self.store.read().await;
        Ok(store.sessions.get(&session_id).cloned())
    }

    async fn update(&self, record: SessionRecord) -> EngineResult<()> {
        let mut store = self.store.write().await;
        if !store.sessions.contains_key(&record.id) {
            return Err(EngineError::SessionNotFound(record.id));
        }
        store.sessions.insert(record.id, record);
        Ok(())
    }

    async fn latest(
        &self,
        conversation_id: ConversationId,
        kind: SessionKind,
    ) -> EngineResult<Option<SessionRecord>> {
        let store = self.store.read().await;
        let id = store
            .by_conversation
            .get(&(conversation_id, kind))
            .and_then(|ids| ids.last());
        Ok(id.and_then(|id| store.sessions.get(id)).cloned())
    }

    async fn history(
        &self,
        conversation_id: ConversationId,
        kind: SessionKind,
    ) -> EngineResult<Vec<SessionRecord>> {
        let store = self.store.read().await;
        let records = store
            .by_conversation
            .get(&(conversation_id, kind))
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| store.sessions.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{PromptPayload, SessionState};

    fn record(conversation_id: ConversationId) -> SessionRecord {
        SessionRecord::new(
            conversation_id,
            SessionKind::CheckIn,
            [ParticipantId::new(), ParticipantId::new()],
            PromptPayload::Single {
                question: "q".to_string(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemorySessionRepository::new();
        let conversation_id = ConversationId::new();
        let rec = record(conversation_id);
        let id = rec.id;

        repo.create(rec).await.unwrap();
        assert!(repo.get(id).await.unwrap().is_some());
        assert!(repo.get(SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let repo = InMemorySessionRepository::new();
        let rec = record(ConversationId::new());
        repo.create(rec.clone()).await.unwrap();
        assert!(matches!(
            repo.create(rec).await,
            Err(EngineError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_second_active_record_of_same_kind() {
        let repo = InMemorySessionRepository::new();
        let conversation_id = ConversationId::new();

        let first = record(conversation_id);
        repo.create(first.clone()).await.unwrap();
        assert!(matches!(
            repo.create(record(conversation_id)).await,
            Err(EngineError::DuplicateActiveSession { .. })
        ));

        // Once the first record is terminal, a new one may be created.
        let mut revealed = first;
        revealed
            .transition_to(SessionState::Completed)
            .unwrap();
        revealed
            .transition_to(SessionState::Revealed)
            .unwrap();
        repo.update(revealed).await.unwrap();
        repo.create(record(conversation_id)).await.unwrap();
    }

    #[tokio::test]
    async fn test_latest_and_history_ordering() {
        let repo = InMemorySessionRepository::new();
        let conversation_id = ConversationId::new();

        let first = record(conversation_id);
        let second = record(conversation_id);
        repo.create(first.clone()).await.unwrap();

        // Terminate the first so the second create is legal.
        let mut revealed = first.clone();
        revealed
            .transition_to(SessionState::Completed)
            .unwrap();
        revealed
            .transition_to(SessionState::Revealed)
            .unwrap();
        repo.update(revealed).await.unwrap();
        repo.create(second.clone()).await.unwrap();

        let latest = repo
            .latest(conversation_id, SessionKind::CheckIn)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, second.id);

        let history = repo
            .history(conversation_id, SessionKind::CheckIn)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, first.id);

        // Different kind, different trail
        assert!(repo
            .latest(conversation_id, SessionKind::Quiz)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_requires_existing() {
        let repo = InMemorySessionRepository::new();
        let rec = record(ConversationId::new());
        assert!(matches!(
            repo.update(rec).await,
            Err(EngineError::SessionNotFound(_))
        ));
    }
}
