//! State Management Traits
//!
//! Snapshot and restore for components whose durability is owned by the host.

use thiserror::Error;

/// Error types for state management operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Snapshot encoding failed: {0}")]
    Encode(#[source] bincode::Error),

    #[error("Snapshot decoding failed: {0}")]
    Decode(#[source] bincode::Error),
}

/// Core trait for stateful components that can be persisted by the host
pub trait Stateful {
    /// Serialize the complete current state
    fn snapshot(&self) -> Result<Vec<u8>, StateError>;

    /// Replace the current state with a previous snapshot
    fn restore(&mut self, snapshot: &[u8]) -> Result<(), StateError>;
}
