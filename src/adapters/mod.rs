//! Adapters implementing the domain ports.

pub mod insight;
pub mod memory;
