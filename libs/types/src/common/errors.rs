//! Error types for pool operations and external asset transfers
//!
//! Every rejection is synchronous and atomic: a call that returns an error has
//! left no trace in reserves, claim balances or asset custody.

use crate::common::identifiers::{AccountId, AssetId, PairKey};
use ethers_core::types::U256;
use thiserror::Error;

/// Which leg of a two-asset operation a slippage check refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// First asset in caller argument order
    A,
    /// Second asset in caller argument order
    B,
    /// Swap output
    Out,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
            Side::Out => write!(f, "output"),
        }
    }
}

/// Failures reported by the external asset transfer capability
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Source account does not hold enough of the asset
    #[error("insufficient funds: {account} holds {available} of {asset}, needs {required}")]
    InsufficientFunds {
        asset: AssetId,
        account: AccountId,
        required: U256,
        available: U256,
    },

    /// Transfer refused for a reason the capability does not classify
    #[error("transfer rejected: {reason}")]
    Rejected { reason: String },
}

/// Errors that abort a pool engine call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Call time is past the deadline
    #[error("expired: now {now} is past deadline {deadline}")]
    Expired { now: u64, deadline: u64 },

    /// Computed amount fell below the caller's minimum
    #[error("slippage exceeded on {side}: got {actual}, minimum {minimum}")]
    SlippageExceeded {
        side: Side,
        actual: U256,
        minimum: U256,
    },

    /// Both sides of a pair name the same asset
    #[error("invalid pair: both assets are {0}")]
    InvalidPair(AssetId),

    /// Operation needs non-zero reserves
    #[error("empty pool: {0}")]
    EmptyPool(PairKey),

    /// Claim-token amount is zero or exceeds the holder's balance
    #[error("insufficient claim balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: U256, available: U256 },

    /// External transfer capability refused the settlement batch
    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    /// An intermediate value would exceed 256 bits
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    /// A reserve or balance would go negative
    #[error("arithmetic underflow in {0}")]
    ArithmeticUnderflow(&'static str),
}

impl PoolError {
    /// Arithmetic failures signal a broken invariant rather than bad input
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PoolError::ArithmeticOverflow(_) | PoolError::ArithmeticUnderflow(_)
        )
    }
}
