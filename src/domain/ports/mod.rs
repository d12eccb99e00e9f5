//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - `SessionRepository`: storage operations for session records
//! - `InsightGenerator`: the external commentary collaborator
//!
//! These traits define the contracts that keep the domain independent of
//! specific infrastructure implementations.

pub mod insight_generator;
pub mod session_repository;

pub use insight_generator::{InsightError, InsightGenerator};
pub use session_repository::SessionRepository;
