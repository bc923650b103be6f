//! Pool reserves in canonical and caller orientation
//!
//! [`Reserve`] is the stored form, indexed by canonical slot. Engines work
//! in caller argument order through [`OrientedReserves`] and write back with
//! [`Reserve::from_oriented`], so no code path ever has to remember which
//! asset sorted lower.

use crate::common::identifiers::{AssetId, PairKey};
use ethers_core::types::U256;
use serde::{Deserialize, Serialize};

/// Stored reserves of one pool, by canonical slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserve {
    pub reserve_lower: U256,
    pub reserve_upper: U256,
}

/// Lifecycle of a pool as seen from its reserves
///
/// `Uninitialized -> Active` happens on the first non-zero deposit, whose
/// amounts set the initial price with no further protection. A full
/// withdrawal returns the pool to `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolStatus {
    Uninitialized,
    Active,
}

/// Reserves of a pool read in caller argument order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientedReserves {
    /// Reserve of the asset the caller named first
    pub reserve_a: U256,
    /// Reserve of the asset the caller named second
    pub reserve_b: U256,
}

impl Reserve {
    pub fn new(reserve_lower: U256, reserve_upper: U256) -> Self {
        Self {
            reserve_lower,
            reserve_upper,
        }
    }

    /// Empty iff both reserves are zero
    pub fn is_empty(&self) -> bool {
        self.reserve_lower.is_zero() && self.reserve_upper.is_zero()
    }

    /// True when either side is zero; swaps and prices need both sides
    pub fn has_zero_side(&self) -> bool {
        self.reserve_lower.is_zero() || self.reserve_upper.is_zero()
    }

    pub fn status(&self) -> PoolStatus {
        if self.is_empty() {
            PoolStatus::Uninitialized
        } else {
            PoolStatus::Active
        }
    }

    /// Read reserves so that `reserve_a` belongs to `first`
    ///
    /// For a degenerate key both slots hold the same asset and the canonical
    /// order is returned unchanged.
    pub fn oriented(&self, key: &PairKey, first: AssetId) -> OrientedReserves {
        if key.is_lower(first) {
            OrientedReserves {
                reserve_a: self.reserve_lower,
                reserve_b: self.reserve_upper,
            }
        } else {
            OrientedReserves {
                reserve_a: self.reserve_upper,
                reserve_b: self.reserve_lower,
            }
        }
    }

    /// Inverse of [`Reserve::oriented`]
    pub fn from_oriented(key: &PairKey, first: AssetId, oriented: OrientedReserves) -> Self {
        if key.is_lower(first) {
            Self::new(oriented.reserve_a, oriented.reserve_b)
        } else {
            Self::new(oriented.reserve_b, oriented.reserve_a)
        }
    }
}

impl OrientedReserves {
    pub fn new(reserve_a: U256, reserve_b: U256) -> Self {
        Self {
            reserve_a,
            reserve_b,
        }
    }

    /// Same pool viewed from the other asset
    pub fn flipped(&self) -> Self {
        Self::new(self.reserve_b, self.reserve_a)
    }
}
