//! Pool State
//!
//! The complete mutable state of the engine: reserves for every pair and all
//! claim-token books. Implements [`Stateful`] so the host can persist it.

use crate::claim_ledger::ClaimLedger;
use crate::reserve_ledger::ReserveLedger;
use crate::traits::{StateError, Stateful};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolState {
    pub reserves: ReserveLedger,
    pub claims: ClaimLedger,
}

impl PoolState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stateful for PoolState {
    fn snapshot(&self) -> Result<Vec<u8>, StateError> {
        bincode::serialize(self).map_err(StateError::Encode)
    }

    fn restore(&mut self, snapshot: &[u8]) -> Result<(), StateError> {
        let restored: PoolState = bincode::deserialize(snapshot).map_err(StateError::Decode)?;
        info!(
            "Restored pool state: {} pairs from {} byte snapshot",
            restored.reserves.len(),
            snapshot.len()
        );
        *self = restored;
        Ok(())
    }
}
