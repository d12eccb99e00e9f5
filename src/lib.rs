//! Tandem - Dual-Blind Synchronized Disclosure Engine
//!
//! Tandem lets exactly two participants in a shared conversation each submit a
//! private answer to a common prompt, keeps each answer hidden from the other
//! participant until both have answered, then atomically reveals both answers
//! together and attaches derived commentary from an external insight generator.
//!
//! Three exchange kinds share the same machinery: a check-in, a journal
//! prompt, and a paired quiz with scoring.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business logic, models, and port traits
//! - **Service Layer** (`services`): Session lifecycle and reveal coordination
//! - **Adapters** (`adapters`): Storage and insight-generator implementations
//! - **Infrastructure Layer** (`infrastructure`): Config loading and logging
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tandem::adapters::memory::InMemorySessionRepository;
//! use tandem::services::{RevealCoordinator, SessionService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let repo = Arc::new(InMemorySessionRepository::new());
//!     let sessions = SessionService::new(repo.clone());
//!     // Wire a RevealCoordinator with an insight generator and go.
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{EngineError, EngineResult};
pub use domain::models::{
    ConversationId, EngineConfig, InsightArtifact, InsightConfig, InsightRequest, LoggingConfig,
    ParticipantId, PromptPayload, QuizItem, QuizItemSpec, SessionId, SessionKind, SessionRecord,
    SessionState, SessionView,
};
pub use domain::ports::{InsightError, InsightGenerator, SessionRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{InsightRequester, RevealCoordinator, SessionService};
