//! Canned insight generator for offline use and demos.

use async_trait::async_trait;

use crate::domain::models::InsightRequest;
use crate::domain::ports::{InsightError, InsightGenerator};

/// Generator that always returns the same commentary. Useful when no
/// downstream service is configured; the reveal flow is identical.
pub struct StaticInsightGenerator {
    text: String,
}

impl StaticInsightGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl InsightGenerator for StaticInsightGenerator {
    async fn generate(&self, _request: &InsightRequest) -> Result<String, InsightError> {
        if self.text.trim().is_empty() {
            return Err(InsightError::EmptyReply);
        }
        Ok(self.text.clone())
    }
}
