//! Request and outcome types for the mutating entry points
//!
//! Field names follow the router convention: `*_desired` is an upper bound,
//! `*_min` a slippage floor, `to` the recipient of minted claims or pushed
//! assets. The caller is passed separately as the `sender` of each call.

use pool_types::{AccountId, AssetId, Deadline, U256};
use serde::{Deserialize, Serialize};

/// Deposit up to `(amount_a_desired, amount_b_desired)` into the A/B pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidity {
    pub asset_a: AssetId,
    pub asset_b: AssetId,
    pub amount_a_desired: U256,
    pub amount_b_desired: U256,
    pub amount_a_min: U256,
    pub amount_b_min: U256,
    pub to: AccountId,
    pub deadline: Deadline,
}

/// Burn `liquidity` claim tokens for a share of the A/B pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidity {
    pub asset_a: AssetId,
    pub asset_b: AssetId,
    pub liquidity: U256,
    pub amount_a_min: U256,
    pub amount_b_min: U256,
    pub to: AccountId,
    pub deadline: Deadline,
}

/// Swap exactly `amount_in` of `asset_in` for at least `amount_out_min` of `asset_out`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapExactIn {
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub amount_in: U256,
    pub amount_out_min: U256,
    pub to: AccountId,
    pub deadline: Deadline,
}

/// Amounts taken from the caller and claim tokens minted, in caller order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityAdded {
    pub amount_a: U256,
    pub amount_b: U256,
    pub liquidity: U256,
}

/// Amounts pushed to the recipient, in caller order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityRemoved {
    pub amount_a: U256,
    pub amount_b: U256,
}
