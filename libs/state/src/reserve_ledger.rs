//! Reserve Ledger
//!
//! Authoritative per-pair reserves. Absent pairs read as zero; entries are
//! created on first write and never removed, even when drained back to zero.

use pool_types::{PairKey, Reserve};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReserveLedger {
    pools: HashMap<PairKey, Reserve>,
}

impl ReserveLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve of `key`, zero-valued if the pool was never written
    pub fn get(&self, key: &PairKey) -> Reserve {
        self.pools.get(key).copied().unwrap_or_default()
    }

    pub fn set(&mut self, key: PairKey, reserve: Reserve) {
        self.pools.insert(key, reserve);
    }

    /// Every stored pair, in canonical order
    pub fn pairs(&self) -> Vec<PairKey> {
        let mut pairs: Vec<PairKey> = self.pools.keys().copied().collect();
        pairs.sort();
        pairs
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
