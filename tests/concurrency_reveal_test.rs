//! Concurrency tests for the reveal coordinator.
//!
//! The two participants' submissions are genuinely concurrent; whatever the
//! interleaving, the record must reach the same terminal state and the
//! insight generator must be invoked exactly once.

mod common;

use common::{harness, MockBehavior};
use tandem::{EngineError, PromptPayload, SessionKind, SessionState};

fn payload() -> PromptPayload {
    PromptPayload::Single {
        question: "What's on your mind?".to_string(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_submissions_fire_insight_exactly_once() {
    for _ in 0..100 {
        let h = harness(MockBehavior::Succeed("once".to_string())).await;
        let record = h
            .sessions
            .start_session(h.conversation_id, SessionKind::CheckIn, payload())
            .await
            .unwrap();

        let a = {
            let coordinator = h.coordinator.clone();
            let (id, alice) = (record.id, h.alice);
            tokio::spawn(async move { coordinator.submit_response(id, alice, "Your humor").await })
        };
        let b = {
            let coordinator = h.coordinator.clone();
            let (id, ben) = (record.id, h.ben);
            tokio::spawn(
                async move { coordinator.submit_response(id, ben, "Your curiosity").await },
            )
        };
        let (a, b) = tokio::join!(a, b);
        a.unwrap().unwrap();
        b.unwrap().unwrap();

        let record = h.repo_snapshot(record.id).await;
        assert_eq!(record.state, SessionState::Revealed);
        assert_eq!(record.responses.len(), 2);
        assert_eq!(h.generator.call_count(), 1, "insight fired more than once");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_starts_leave_exactly_one_active_session() {
    // The check-and-insert inside SessionRepository::create is one critical
    // section, so two concurrent starts of the same kind resolve to one
    // winner and one DuplicateActiveSession whatever the interleaving.
    for _ in 0..100 {
        let h = harness(MockBehavior::Succeed("ok".to_string())).await;

        let a = {
            let sessions = h.sessions.clone();
            let conversation_id = h.conversation_id;
            tokio::spawn(async move {
                sessions
                    .start_session(conversation_id, SessionKind::CheckIn, payload())
                    .await
            })
        };
        let b = {
            let sessions = h.sessions.clone();
            let conversation_id = h.conversation_id;
            tokio::spawn(async move {
                sessions
                    .start_session(conversation_id, SessionKind::CheckIn, payload())
                    .await
            })
        };
        let (a, b) = tokio::join!(a, b);
        let results = [a.unwrap(), b.unwrap()];

        let started = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(started, 1, "both racing starts succeeded");
        let loser = results.iter().find(|r| r.is_err()).unwrap();
        assert!(matches!(
            loser.as_ref().unwrap_err(),
            EngineError::DuplicateActiveSession { .. }
        ));

        let history = h
            .sessions
            .history(h.conversation_id, SessionKind::CheckIn)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].state, SessionState::Pending);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_terminal_state_is_order_independent() {
    // Ben first, then Alice: same terminal state as the reverse order.
    let h = harness(MockBehavior::Succeed("steady".to_string())).await;
    let record = h
        .sessions
        .start_session(h.conversation_id, SessionKind::CheckIn, payload())
        .await
        .unwrap();

    h.coordinator
        .submit_response(record.id, h.ben, "b")
        .await
        .unwrap();
    let record = h
        .coordinator
        .submit_response(record.id, h.alice, "a")
        .await
        .unwrap();

    assert_eq!(record.state, SessionState::Revealed);
    assert_eq!(record.responses[&h.alice], "a");
    assert_eq!(record.responses[&h.ben], "b");
    assert_eq!(h.generator.call_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_writes_to_different_records_do_not_block() {
    // A hung insight call on one conversation's journal must not stall an
    // unrelated check-in reveal.
    let slow = harness(MockBehavior::Hang).await;
    let fast = harness(MockBehavior::Succeed("quick".to_string())).await;

    let slow_record = slow
        .sessions
        .start_session(slow.conversation_id, SessionKind::JournalPrompt, payload())
        .await
        .unwrap();
    let fast_record = fast
        .sessions
        .start_session(fast.conversation_id, SessionKind::CheckIn, payload())
        .await
        .unwrap();

    let slow_task = {
        let coordinator = slow.coordinator.clone();
        let (id, alice, ben) = (slow_record.id, slow.alice, slow.ben);
        tokio::spawn(async move {
            coordinator.submit_response(id, alice, "a").await.unwrap();
            coordinator.submit_response(id, ben, "b").await.unwrap()
        })
    };

    // The fast conversation completes while the slow one is still waiting
    // out its insight timeout.
    fast.coordinator
        .submit_response(fast_record.id, fast.alice, "a")
        .await
        .unwrap();
    let revealed = fast
        .coordinator
        .submit_response(fast_record.id, fast.ben, "b")
        .await
        .unwrap();
    assert_eq!(revealed.state, SessionState::Revealed);

    let slow_result = slow_task.await.unwrap();
    assert_eq!(slow_result.state, SessionState::Revealed);
    assert!(slow_result.insight.unwrap().fallback);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overwrites_keep_one_answer_per_participant() {
    let h = harness(MockBehavior::Succeed("fin".to_string())).await;
    let record = h
        .sessions
        .start_session(h.conversation_id, SessionKind::CheckIn, payload())
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..10 {
        let coordinator = h.coordinator.clone();
        let (id, alice) = (record.id, h.alice);
        tasks.push(tokio::spawn(async move {
            coordinator.submit_response(id, alice, format!("draft {i}")).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let record = h.repo_snapshot(record.id).await;
    assert_eq!(record.state, SessionState::Pending);
    assert_eq!(record.responses.len(), 1);
    assert!(record.responses[&h.alice].starts_with("draft"));
}
