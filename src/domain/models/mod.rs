pub mod config;
pub mod insight;
pub mod quiz;
pub mod session;
pub mod view;

pub use config::{EngineConfig, InsightConfig, LoggingConfig};
pub use insight::{InsightArtifact, InsightExchange, InsightRequest};
pub use quiz::{QuizItem, QuizItemSpec};
pub use session::{
    ConversationId, ParticipantId, PromptPayload, SessionId, SessionKind, SessionPrompt,
    SessionRecord, SessionState,
};
pub use view::{QuizItemView, SessionView};
