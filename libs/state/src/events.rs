//! Events recorded for every committed pool operation
//!
//! Amounts in `Mint`, `Burn` and `Sync` are in canonical slot order
//! (`lower`, `upper`), independent of how the caller named the assets.

use pool_types::{AccountId, AssetId, PairKey, Reserve, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    /// Liquidity deposited and claim tokens minted
    Mint {
        pair: PairKey,
        sender: AccountId,
        to: AccountId,
        amount_lower: U256,
        amount_upper: U256,
        liquidity: U256,
    },
    /// Claim tokens burned and liquidity withdrawn
    Burn {
        pair: PairKey,
        sender: AccountId,
        to: AccountId,
        amount_lower: U256,
        amount_upper: U256,
        liquidity: U256,
    },
    /// Exact-input swap
    Swap {
        pair: PairKey,
        sender: AccountId,
        to: AccountId,
        asset_in: AssetId,
        amount_in: U256,
        amount_out: U256,
    },
    /// Reserves after a committed operation
    Sync { pair: PairKey, reserve: Reserve },
}
