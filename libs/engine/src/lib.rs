//! # Tidepool Engine - Constant-Product Liquidity Pools
//!
//! ## Purpose
//!
//! Two-asset pools with shared reserves: callers deposit asset pairs and
//! receive claim tokens, redeem claim tokens for their share, and swap one
//! asset for the other along the zero-fee x*y=k curve.
//!
//! ## Operation Flow
//!
//! Every mutating entry point runs the same sequence under the engine's
//! write lock:
//!
//! ```text
//! deadline ─► canonical PairKey ─► load Reserve ─► compute amounts (pool-amm)
//!    ─► slippage guards ─► settle one TransferBatch ─► commit reserves + claims
//! ```
//!
//! Any failure before the commit leaves no trace: the transfer batch is
//! all-or-nothing and nothing is written until it succeeds.
//!
//! ## Entry Points
//!
//! | Operation | Kind |
//! |-----------|------|
//! | [`PoolEngine::add_liquidity`] | mutating |
//! | [`PoolEngine::remove_liquidity`] | mutating |
//! | [`PoolEngine::swap_exact_tokens_for_tokens`] | mutating |
//! | [`PoolEngine::get_price`] | read-only |
//! | [`PoolEngine::get_amount_out`] | read-only |
//! | [`PoolEngine::get_reserves`] | read-only |
//!
//! ## Trust Assumption
//!
//! The first deposit into an empty pool sets its price. No minimum liquidity
//! is locked and nothing protects against a skewed first deposit.

pub mod engine;
pub mod liquidity;
pub mod price;
pub mod requests;
pub mod swap;

pub use engine::PoolEngine;
pub use requests::{AddLiquidity, LiquidityAdded, LiquidityRemoved, RemoveLiquidity, SwapExactIn};

pub use pool_config::{ClaimScope, EngineSettings};
pub use pool_state::{AssetTransfer, Clock, ManualClock, MemoryVault, PoolEvent, SystemClock};
pub use pool_types::{AccountId, AssetId, Deadline, PairKey, PoolError, PoolStatus, U256};
