//! Fire-once adapter around the insight generator.
//!
//! Wraps the `InsightGenerator` port with a bounded timeout and the fallback
//! policy: any failure, timeout, or empty reply yields canned commentary so a
//! hung or broken downstream can never leave a record stuck in `Completed`.
//! No automatic retry; a participant may explicitly re-roll for kinds that
//! support regeneration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::domain::models::{
    InsightArtifact, InsightConfig, InsightRequest, SessionKind, SessionRecord,
};
use crate::domain::ports::InsightGenerator;

const CHECK_IN_FALLBACK: &str =
    "You both showed up for this check-in. Take a moment to read each other's answers.";
const JOURNAL_FALLBACK: &str =
    "Two honest entries, side by side. Sometimes the answers speak for themselves.";
const QUIZ_FALLBACK: &str =
    "Scores are in! Compare your answers and see where you think alike.";

/// Timeout-bounded, failure-tolerant requester for derived commentary.
pub struct InsightRequester {
    generator: Arc<dyn InsightGenerator>,
    timeout: Duration,
    /// Per-kind fallback overrides from config, keyed by `SessionKind::as_str`
    fallback_overrides: HashMap<String, String>,
}

impl InsightRequester {
    pub fn new(generator: Arc<dyn InsightGenerator>, config: &InsightConfig) -> Self {
        Self {
            generator,
            timeout: Duration::from_millis(config.timeout_ms),
            fallback_overrides: config.fallback_commentary.clone(),
        }
    }

    /// Requester with an explicit timeout and built-in fallbacks.
    pub fn with_timeout(generator: Arc<dyn InsightGenerator>, timeout: Duration) -> Self {
        Self {
            generator,
            timeout,
            fallback_overrides: HashMap::new(),
        }
    }

    fn fallback_text(&self, kind: SessionKind) -> String {
        if let Some(text) = self.fallback_overrides.get(kind.as_str()) {
            return text.clone();
        }
        match kind {
            SessionKind::CheckIn => CHECK_IN_FALLBACK.to_string(),
            SessionKind::JournalPrompt => JOURNAL_FALLBACK.to_string(),
            SessionKind::Quiz => QUIZ_FALLBACK.to_string(),
        }
    }

    /// Request commentary for a session snapshot. Infallible by design: the
    /// result is either generated commentary or non-empty fallback text,
    /// tagged with the record's current insight generation.
    pub async fn request(&self, record: &SessionRecord) -> InsightArtifact {
        let request = InsightRequest::from_record(record);
        let generation = request.generation;

        match timeout(self.timeout, self.generator.generate(&request)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                InsightArtifact::generated(text, generation)
            }
            Ok(Ok(_)) => {
                warn!(session_id = %record.id, "insight generator returned empty commentary, using fallback");
                InsightArtifact::fallback(self.fallback_text(record.kind), generation)
            }
            Ok(Err(error)) => {
                warn!(session_id = %record.id, %error, "insight generation failed, using fallback");
                InsightArtifact::fallback(self.fallback_text(record.kind), generation)
            }
            Err(_) => {
                warn!(
                    session_id = %record.id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "insight generation timed out, using fallback"
                );
                InsightArtifact::fallback(self.fallback_text(record.kind), generation)
            }
        }
    }
}
