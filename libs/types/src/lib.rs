//! # Tidepool Types
//!
//! Shared vocabulary for the constant-product pool engine.
//!
//! ## Design Philosophy
//!
//! - **Typed Identifiers**: assets and accounts are distinct 160-bit wrappers
//!   so a holder can never be passed where an asset is expected
//! - **Canonical Pairs**: a pool is addressed by its [`PairKey`], identical for
//!   both argument orders
//! - **Integer Amounts**: every amount is a `U256`, no floating point anywhere
//! - **Typed Failures**: all rejections are [`PoolError`] variants carrying the
//!   values that caused them
//!
//! ## Quick Start
//!
//! ```rust
//! use pool_types::{AssetId, PairKey};
//!
//! let usdc = AssetId::from_low_u64(2);
//! let weth = AssetId::from_low_u64(1);
//!
//! let key = PairKey::new(usdc, weth);
//! assert_eq!(key, PairKey::new(weth, usdc));
//! assert_eq!(key.lower(), weth);
//! ```

pub mod common;
pub mod deadline;
pub mod reserve;

pub use common::errors::{PoolError, Side, TransferError};
pub use common::identifiers::{AccountId, AssetId, PairKey};
pub use deadline::Deadline;
pub use reserve::{OrientedReserves, PoolStatus, Reserve};

/// 256-bit unsigned amount used for reserves, transfers and claim tokens
pub use ethers_core::types::U256;

/// 160-bit address wrapped by [`AssetId`] and [`AccountId`]
pub use ethers_core::types::Address;
