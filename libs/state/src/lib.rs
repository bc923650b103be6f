//! # Pool State - Ledgers and External Collaborators
//!
//! ## Purpose
//!
//! Everything the pool engine reads or writes outside of pure math: the
//! reserve ledger keyed by canonical pair, the claim-token books, the asset
//! transfer capability, the call-time clock and the event log records.
//!
//! ## Architecture Role
//!
//! ```text
//! PoolEngine ──write lock──► PoolState { ReserveLedger, ClaimLedger }
//!     │                            │
//!     ├──settle(batch)──► AssetTransfer (MemoryVault / host)
//!     ├──now()──────────► Clock (SystemClock / ManualClock)
//!     └──records────────► PoolEvent
//!                                  │
//!                      Stateful::snapshot / restore (bincode)
//! ```
//!
//! Ledgers never lock on their own. The engine serializes every mutating
//! call, so a ledger only needs to be correct for a single writer.

pub mod claim_ledger;
pub mod clock;
pub mod events;
pub mod pool_state;
pub mod reserve_ledger;
pub mod traits;
pub mod transfer;

pub use claim_ledger::{ClaimBook, ClaimLedger, LedgerKey};
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::PoolEvent;
pub use pool_state::PoolState;
pub use reserve_ledger::ReserveLedger;
pub use traits::{StateError, Stateful};
pub use transfer::{AssetTransfer, MemoryVault, Transfer, TransferBatch};
