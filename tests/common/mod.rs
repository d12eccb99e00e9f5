//! Shared test fixtures: a counting mock insight generator and a wired-up
//! engine harness.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use tandem::adapters::memory::InMemorySessionRepository;
use tandem::domain::ports::{InsightError, InsightGenerator};
use tandem::{
    ConversationId, InsightRequest, InsightRequester, ParticipantId, RevealCoordinator,
    SessionId, SessionRecord, SessionRepository, SessionService,
};

/// What the mock generator should do when called.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return this commentary
    Succeed(String),
    /// Fail with a transport error
    Fail,
    /// Sleep far past any test timeout before answering
    Hang,
}

/// Insight generator double that counts its invocations.
pub struct MockInsightGenerator {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockInsightGenerator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InsightGenerator for MockInsightGenerator {
    async fn generate(&self, _request: &InsightRequest) -> Result<String, InsightError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Succeed(text) => Ok(text.clone()),
            MockBehavior::Fail => Err(InsightError::Transport("connection refused".to_string())),
            MockBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok("too late".to_string())
            }
        }
    }
}

/// A fully wired engine over in-memory storage with one registered
/// conversation between Alice and Ben.
pub struct Harness {
    pub repo: Arc<InMemorySessionRepository>,
    pub sessions: Arc<SessionService>,
    pub coordinator: Arc<RevealCoordinator>,
    pub generator: Arc<MockInsightGenerator>,
    pub conversation_id: ConversationId,
    pub alice: ParticipantId,
    pub ben: ParticipantId,
}

impl Harness {
    /// Raw stored record, bypassing redaction. Test-only.
    pub async fn repo_snapshot(&self, session_id: SessionId) -> SessionRecord {
        self.repo
            .get(session_id)
            .await
            .expect("repository read")
            .expect("record exists")
    }
}

pub async fn harness(behavior: MockBehavior) -> Harness {
    harness_with_timeout(behavior, Duration::from_millis(250)).await
}

pub async fn harness_with_timeout(behavior: MockBehavior, timeout: Duration) -> Harness {
    let repo = Arc::new(InMemorySessionRepository::new());
    let generator = Arc::new(MockInsightGenerator::new(behavior));
    let requester = InsightRequester::with_timeout(generator.clone(), timeout);
    let coordinator = Arc::new(RevealCoordinator::new(repo.clone(), requester));
    let sessions = Arc::new(SessionService::new(repo.clone()));

    let conversation_id = ConversationId::new();
    let alice = ParticipantId::new();
    let ben = ParticipantId::new();
    sessions
        .register_conversation(conversation_id, [alice, ben])
        .await
        .expect("conversation registration");

    Harness {
        repo,
        sessions,
        coordinator,
        generator,
        conversation_id,
        alice,
        ben,
    }
}
