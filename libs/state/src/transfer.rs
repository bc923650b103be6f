//! Asset Transfer Capability
//!
//! The engine never moves assets itself. Each mutating call hands one
//! [`TransferBatch`] to an [`AssetTransfer`] implementation, which must apply
//! every leg or none of them. [`MemoryVault`] is the in-process
//! implementation used by tests and the simulator.

use parking_lot::Mutex;
use pool_types::{AccountId, AssetId, TransferError, U256};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

/// One leg of a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transfer {
    /// Move `amount` of `asset` from `from` into pool custody
    Pull {
        asset: AssetId,
        from: AccountId,
        amount: U256,
    },
    /// Move `amount` of `asset` from pool custody to `to`
    Push {
        asset: AssetId,
        to: AccountId,
        amount: U256,
    },
}

/// Ordered legs applied all-or-nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferBatch {
    legs: Vec<Transfer>,
}

impl TransferBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pull(mut self, asset: AssetId, from: AccountId, amount: U256) -> Self {
        self.legs.push(Transfer::Pull {
            asset,
            from,
            amount,
        });
        self
    }

    pub fn push(mut self, asset: AssetId, to: AccountId, amount: U256) -> Self {
        self.legs.push(Transfer::Push { asset, to, amount });
        self
    }

    pub fn legs(&self) -> &[Transfer] {
        &self.legs
    }
}

/// External capability that moves assets between callers and the pool
pub trait AssetTransfer: Send + Sync {
    /// Apply every leg of `batch`, or none of them on error
    fn settle(&self, batch: &TransferBatch) -> Result<(), TransferError>;
}

impl<T: AssetTransfer + ?Sized> AssetTransfer for Arc<T> {
    fn settle(&self, batch: &TransferBatch) -> Result<(), TransferError> {
        (**self).settle(batch)
    }
}

/// In-memory balances with a single pool custody account
pub struct MemoryVault {
    custody: AccountId,
    balances: Mutex<HashMap<(AssetId, AccountId), U256>>,
    frozen: Mutex<HashSet<AssetId>>,
}

impl MemoryVault {
    pub fn new(custody: AccountId) -> Self {
        Self {
            custody,
            balances: Mutex::new(HashMap::new()),
            frozen: Mutex::new(HashSet::new()),
        }
    }

    /// Mint `amount` of `asset` to `account` outside of any pool
    pub fn credit(&self, asset: AssetId, account: AccountId, amount: U256) -> Result<(), TransferError> {
        let mut balances = self.balances.lock();
        let balance = balances.entry((asset, account)).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| TransferError::Rejected {
                reason: format!("balance overflow crediting {}", account),
            })?;
        Ok(())
    }

    pub fn balance_of(&self, asset: AssetId, account: AccountId) -> U256 {
        self.balances
            .lock()
            .get(&(asset, account))
            .copied()
            .unwrap_or_default()
    }

    /// Amount of `asset` held by the pool
    pub fn custody_balance(&self, asset: AssetId) -> U256 {
        self.balance_of(asset, self.custody)
    }

    /// Make every later batch touching `asset` fail with `Rejected`
    pub fn freeze(&self, asset: AssetId) {
        self.frozen.lock().insert(asset);
    }

    pub fn unfreeze(&self, asset: AssetId) {
        self.frozen.lock().remove(&asset);
    }

    fn debit(
        working: &mut HashMap<(AssetId, AccountId), U256>,
        balances: &HashMap<(AssetId, AccountId), U256>,
        asset: AssetId,
        account: AccountId,
        amount: U256,
    ) -> Result<(), TransferError> {
        let available = working
            .get(&(asset, account))
            .or_else(|| balances.get(&(asset, account)))
            .copied()
            .unwrap_or_default();
        let remaining = available
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientFunds {
                asset,
                account,
                required: amount,
                available,
            })?;
        working.insert((asset, account), remaining);
        Ok(())
    }

    fn deposit(
        working: &mut HashMap<(AssetId, AccountId), U256>,
        balances: &HashMap<(AssetId, AccountId), U256>,
        asset: AssetId,
        account: AccountId,
        amount: U256,
    ) -> Result<(), TransferError> {
        let current = working
            .get(&(asset, account))
            .or_else(|| balances.get(&(asset, account)))
            .copied()
            .unwrap_or_default();
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| TransferError::Rejected {
                reason: format!("balance overflow for {}", account),
            })?;
        working.insert((asset, account), updated);
        Ok(())
    }
}

impl AssetTransfer for MemoryVault {
    fn settle(&self, batch: &TransferBatch) -> Result<(), TransferError> {
        {
            let frozen = self.frozen.lock();
            for leg in batch.legs() {
                let asset = match leg {
                    Transfer::Pull { asset, .. } | Transfer::Push { asset, .. } => asset,
                };
                if frozen.contains(asset) {
                    warn!("Rejecting settlement: {} is frozen", asset);
                    return Err(TransferError::Rejected {
                        reason: format!("{} is frozen", asset),
                    });
                }
            }
        }

        let mut balances = self.balances.lock();

        // Stage every touched balance; nothing is written until all legs pass
        let mut working = HashMap::new();
        for leg in batch.legs() {
            match *leg {
                Transfer::Pull {
                    asset,
                    from,
                    amount,
                } => {
                    Self::debit(&mut working, &balances, asset, from, amount)?;
                    Self::deposit(&mut working, &balances, asset, self.custody, amount)?;
                }
                Transfer::Push { asset, to, amount } => {
                    Self::debit(&mut working, &balances, asset, self.custody, amount)?;
                    Self::deposit(&mut working, &balances, asset, to, amount)?;
                }
            }
        }

        debug!("Settled {} transfer legs", batch.legs().len());
        balances.extend(working);
        Ok(())
    }
}
