//! Service layer: session lifecycle and reveal coordination.

pub mod insight_requester;
pub mod reveal_coordinator;
pub mod scoring;
pub mod session_service;

pub use insight_requester::InsightRequester;
pub use reveal_coordinator::RevealCoordinator;
pub use session_service::SessionService;
