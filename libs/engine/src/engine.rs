//! Pool Engine
//!
//! Owns the pool state behind a single `RwLock`. Mutating calls hold the
//! write lock from the deadline check to the commit, which serializes every
//! operation across every pool; the shared claim supply under
//! [`ClaimScope::Global`] couples pools, so a per-pair lock would not be
//! enough. Read-only queries take the read lock and always see both reserves
//! of a pair from the same commit.

use parking_lot::{Mutex, RwLock};
use pool_amm::MathError;
use pool_config::{ClaimScope, EngineSettings};
use pool_state::{
    AssetTransfer, Clock, LedgerKey, PoolEvent, PoolState, StateError, Stateful, TransferBatch,
};
use pool_types::{
    AccountId, AssetId, Deadline, OrientedReserves, PairKey, PoolError, PoolStatus, Side, U256,
};
use tracing::{error, warn};

pub struct PoolEngine<T, C> {
    settings: EngineSettings,
    pub(crate) state: RwLock<PoolState>,
    events: Mutex<Vec<PoolEvent>>,
    transfer: T,
    clock: C,
}

impl<T: AssetTransfer, C: Clock> PoolEngine<T, C> {
    pub fn new(settings: EngineSettings, transfer: T, clock: C) -> Self {
        Self {
            settings,
            state: RwLock::new(PoolState::new()),
            events: Mutex::new(Vec::new()),
            transfer,
            clock,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Reserves of the A/B pool in caller order; absent pools read as zero
    pub fn get_reserves(&self, asset_a: AssetId, asset_b: AssetId) -> OrientedReserves {
        let key = PairKey::new(asset_a, asset_b);
        self.state.read().reserves.get(&key).oriented(&key, asset_a)
    }

    pub fn pool_status(&self, asset_a: AssetId, asset_b: AssetId) -> PoolStatus {
        let key = PairKey::new(asset_a, asset_b);
        self.state.read().reserves.get(&key).status()
    }

    /// Claim tokens `holder` holds against the A/B pool under the configured scope
    pub fn claim_balance_of(&self, asset_a: AssetId, asset_b: AssetId, holder: AccountId) -> U256 {
        let ledger = self.ledger_key(PairKey::new(asset_a, asset_b));
        self.state.read().claims.balance_of(&ledger, &holder)
    }

    /// Claim-token supply backing the A/B pool under the configured scope
    pub fn claim_total_supply(&self, asset_a: AssetId, asset_b: AssetId) -> U256 {
        let ledger = self.ledger_key(PairKey::new(asset_a, asset_b));
        self.state.read().claims.total_supply(&ledger)
    }

    /// Every pair ever deposited into, in canonical order
    pub fn pairs(&self) -> Vec<PairKey> {
        self.state.read().reserves.pairs()
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&self) -> Vec<PoolEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Serialize reserves and claim books for host-managed persistence
    pub fn snapshot(&self) -> Result<Vec<u8>, StateError> {
        self.state.read().snapshot()
    }

    /// Replace all reserves and claim books with a snapshot
    pub fn restore(&self, snapshot: &[u8]) -> Result<(), StateError> {
        self.state.write().restore(snapshot)
    }

    pub(crate) fn ledger_key(&self, key: PairKey) -> LedgerKey {
        match self.settings.claim_scope {
            ClaimScope::Global => LedgerKey::Global,
            ClaimScope::PerPool => LedgerKey::Pool(key),
        }
    }

    /// Read the clock once and check the call's deadline against it
    pub(crate) fn check_deadline(&self, deadline: &Deadline) -> Result<(), PoolError> {
        let now = self.clock.now();
        deadline.check(now)
    }

    pub(crate) fn settle(&self, batch: &TransferBatch) -> Result<(), PoolError> {
        self.transfer.settle(batch).map_err(PoolError::from)
    }

    pub(crate) fn record(&self, events: impl IntoIterator<Item = PoolEvent>) {
        self.events.lock().extend(events);
    }
}

/// Map math-layer failures onto the pair being operated on
pub(crate) fn math_error(key: PairKey) -> impl Fn(MathError) -> PoolError {
    move |err| match err {
        MathError::Overflow(context) => PoolError::ArithmeticOverflow(context),
        MathError::DivisionByZero(_) => PoolError::EmptyPool(key),
    }
}

/// Slippage guard: reject when `actual < minimum`
pub(crate) fn ensure_min(side: Side, actual: U256, minimum: U256) -> Result<(), PoolError> {
    if actual < minimum {
        return Err(PoolError::SlippageExceeded {
            side,
            actual,
            minimum,
        });
    }
    Ok(())
}

pub(crate) fn checked_add(a: U256, b: U256, context: &'static str) -> Result<U256, PoolError> {
    a.checked_add(b).ok_or(PoolError::ArithmeticOverflow(context))
}

pub(crate) fn checked_sub(a: U256, b: U256, context: &'static str) -> Result<U256, PoolError> {
    a.checked_sub(b).ok_or_else(|| {
        error!("Invariant violation: {} - {} underflows in {}", a, b, context);
        PoolError::ArithmeticUnderflow(context)
    })
}

/// Log a rejected call at a level matching its severity
pub(crate) fn log_rejection(operation: &'static str, err: &PoolError) {
    if err.is_fatal() {
        error!("{} aborted: {}", operation, err);
    } else {
        warn!("{} rejected: {}", operation, err);
    }
}
