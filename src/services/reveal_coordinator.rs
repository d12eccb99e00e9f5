//! Reveal coordination.
//!
//! The `RevealCoordinator` owns every state-affecting write against a session
//! record and is the only component allowed to flip visibility. A per-record
//! async mutex serializes writes, so the completion predicate is always
//! evaluated in the same critical section as the write that might satisfy
//! it. Two racing submissions therefore produce exactly one
//! `Pending -> Completed` transition and exactly one insight call, regardless
//! of arrival order. Writes against different records never contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::{ParticipantId, SessionId, SessionRecord, SessionState};
use crate::domain::ports::SessionRepository;

use super::insight_requester::InsightRequester;
use super::scoring;

/// State machine driver for `pending -> completed -> revealed`.
///
/// Methods return the full stored `SessionRecord` for the host side of the
/// call: these snapshots are unredacted and include answers the other
/// participant must not see yet. Anything shown to a participant goes
/// through `SessionService::view`, which applies the visibility rule.
pub struct RevealCoordinator {
    repo: Arc<dyn SessionRepository>,
    insight: InsightRequester,
    /// Per-record critical sections. Entries are created on first touch and
    /// kept for the life of the process; a record is the unit of mutual
    /// exclusion.
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl RevealCoordinator {
    pub fn new(repo: Arc<dyn SessionRepository>, insight: InsightRequester) -> Self {
        Self {
            repo,
            insight,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn record_lock(&self, session_id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(session_id).or_default().clone()
    }

    async fn load(&self, session_id: SessionId) -> EngineResult<SessionRecord> {
        self.repo
            .get(session_id)
            .await?
            .ok_or(EngineError::SessionNotFound(session_id))
    }

    /// Submit a private answer to a check-in or journal session.
    ///
    /// Re-submission by the same participant before completion overwrites
    /// the prior answer. The write, the completion check, and any resulting
    /// transition happen atomically with respect to the other participant's
    /// submission.
    #[instrument(skip(self, answer), fields(%session_id, %participant_id), err)]
    pub async fn submit_response(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
        answer: impl Into<String> + Send,
    ) -> EngineResult<SessionRecord> {
        let lock = self.record_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut record = self.load(session_id).await?;
        record.record_response(participant_id, answer.into())?;
        self.commit(record).await
    }

    /// Submit a private answer to the current item of a quiz session.
    ///
    /// Item completion escalates to record completion once all items are
    /// complete.
    #[instrument(skip(self), fields(%session_id, %participant_id, %item_id), err)]
    pub async fn answer_quiz_item(
        &self,
        session_id: SessionId,
        participant_id: ParticipantId,
        item_id: Uuid,
        chosen_option: &str,
    ) -> EngineResult<SessionRecord> {
        let lock = self.record_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut record = self.load(session_id).await?;
        let item_complete = record.record_quiz_answer(participant_id, item_id, chosen_option)?;
        if item_complete {
            debug!(%item_id, "quiz item complete");
        }
        self.commit(record).await
    }

    /// Re-roll the derived commentary for a revealed session.
    ///
    /// Only kinds that support regeneration accept this. The generation
    /// counter is bumped under the record lock, the external call runs
    /// outside it, and a result arriving for a superseded generation is
    /// discarded on write-back.
    #[instrument(skip(self), fields(%session_id, %caller), err)]
    pub async fn regenerate_insight(
        &self,
        session_id: SessionId,
        caller: ParticipantId,
    ) -> EngineResult<SessionRecord> {
        let lock = self.record_lock(session_id).await;

        let snapshot = {
            let _guard = lock.lock().await;
            let mut record = self.load(session_id).await?;
            if !record.is_participant(caller) {
                return Err(EngineError::UnknownParticipant {
                    session_id,
                    participant_id: caller,
                });
            }
            if !record.kind.supports_regeneration() {
                return Err(EngineError::RegenerationUnsupported { kind: record.kind });
            }
            if record.state != SessionState::Revealed {
                return Err(EngineError::SessionNotRevealed(session_id));
            }
            record.bump_insight_generation();
            self.repo.update(record.clone()).await?;
            record
        };

        let artifact = self.insight.request(&snapshot).await;

        let _guard = lock.lock().await;
        let mut record = self.load(session_id).await?;
        if record.attach_insight(artifact) {
            self.repo.update(record.clone()).await?;
        } else {
            debug!(
                generation = snapshot.insight_generation,
                current = record.insight_generation,
                "discarding stale insight result"
            );
        }
        Ok(record)
    }

    /// Persist a written record, driving the reveal when the completion
    /// predicate has just become true. Runs inside the per-record critical
    /// section.
    async fn commit(&self, mut record: SessionRecord) -> EngineResult<SessionRecord> {
        if record.state != SessionState::Pending || !record.responses_complete() {
            self.repo.update(record.clone()).await?;
            return Ok(record);
        }

        record.transition_to(SessionState::Completed)?;
        if record.kind.is_scored() {
            let totals = record
                .items()
                .map(|items| scoring::aggregate(items, &record.participants));
            if let Some(totals) = totals {
                record.set_scores(totals);
            }
        }

        if record.kind.insight_before_reveal() {
            // Journal and quiz hold the reveal until the insight call
            // settles (success or fallback, bounded by the timeout).
            self.repo.update(record.clone()).await?;
            let artifact = self.insight.request(&record).await;
            record.attach_insight(artifact);
            record.transition_to(SessionState::Revealed)?;
            self.repo.update(record.clone()).await?;
        } else {
            // Check-ins reveal immediately; the raw answers are never gated
            // on the commentary call. The artifact is attached afterwards as
            // the one permitted post-reveal write.
            record.transition_to(SessionState::Revealed)?;
            self.repo.update(record.clone()).await?;
            let artifact = self.insight.request(&record).await;
            record.attach_insight(artifact);
            self.repo.update(record.clone()).await?;
        }

        info!(
            session_id = %record.id,
            kind = %record.kind,
            "session revealed"
        );
        Ok(record)
    }
}
