/// Insight generator port (trait) for dependency injection.
///
/// The external collaborator that turns a completed exchange into
/// natural-language commentary. The engine treats it as opaque beyond
/// capturing success or failure; any failure is recovered locally via
/// fallback commentary and never blocks a reveal.
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::InsightRequest;

/// Errors from the insight generator adapter.
///
/// These never surface to submit callers; the `InsightRequester` converts
/// them into fallback commentary and logs at `warn`.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Generator returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed generator reply: {0}")]
    MalformedReply(String),

    #[error("Generator returned empty commentary")]
    EmptyReply,
}

/// Port for the external commentary collaborator.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Produce commentary for a completed session snapshot.
    async fn generate(&self, request: &InsightRequest) -> Result<String, InsightError>;
}
