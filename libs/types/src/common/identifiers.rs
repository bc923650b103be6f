//! # Typed Address Identifiers and Canonical Pair Keys
//!
//! Assets and accounts are both 160-bit addresses on the wire, but mixing
//! them up is a real bug class in a pool engine: a swap that credits the
//! asset address instead of the recipient silently burns funds. Each gets its
//! own zero-cost wrapper generated by [`define_address_id!`].
//!
//! ## Canonical Ordering
//!
//! A pool is stored once per unordered pair. [`PairKey::new`] sorts the two
//! assets by the big-endian integer value of their address, so
//! `PairKey::new(a, b) == PairKey::new(b, a)` for every `a`, `b`.
//!
//! ```rust
//! use pool_types::{AssetId, PairKey};
//!
//! let a = AssetId::from_low_u64(7);
//! let b = AssetId::from_low_u64(3);
//!
//! let key = PairKey::new(a, b);
//! assert_eq!((key.lower(), key.upper()), (b, a));
//! assert!(key.is_lower(b));
//! ```

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};

/// Macro for generating zero-cost typed address wrappers
///
/// The generated type has the memory layout of [`Address`], orders exactly
/// like the underlying big-endian integer and serializes as the inner
/// address.
#[macro_export]
macro_rules! define_address_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Default,
            serde::Serialize,
            serde::Deserialize
        )]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(pub $crate::Address);

        impl $name {
            /// Create a new typed identifier
            #[inline(always)]
            pub const fn new(inner: $crate::Address) -> Self {
                Self(inner)
            }

            /// Identifier whose low 8 bytes hold `value` (big-endian), rest zero
            pub fn from_low_u64(value: u64) -> Self {
                Self($crate::Address::from_low_u64_be(value))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:#x})", stringify!($name), self.0)
            }
        }

        impl From<$crate::Address> for $name {
            #[inline(always)]
            fn from(inner: $crate::Address) -> Self {
                Self(inner)
            }
        }

        impl From<$name> for $crate::Address {
            #[inline(always)]
            fn from(wrapper: $name) -> $crate::Address {
                wrapper.0
            }
        }
    };
}

define_address_id!(
    /// Identifier of a fungible asset type held in pools
    AssetId
);

define_address_id!(
    /// Identifier of a caller, recipient or claim-token holder
    AccountId
);

/// Order-independent identifier of a pool
///
/// Invariant: `lower <= upper`. The two are equal only for the degenerate
/// self-pair, which callers that require distinct assets reject before
/// building a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    lower: AssetId,
    upper: AssetId,
}

impl PairKey {
    /// Canonicalize two asset identifiers into `(lower, upper)`
    pub fn new(a: AssetId, b: AssetId) -> Self {
        if a <= b {
            Self { lower: a, upper: b }
        } else {
            Self { lower: b, upper: a }
        }
    }

    pub fn lower(&self) -> AssetId {
        self.lower
    }

    pub fn upper(&self) -> AssetId {
        self.upper
    }

    /// True when `asset` occupies the lower slot of this key
    pub fn is_lower(&self, asset: AssetId) -> bool {
        self.lower == asset
    }

    /// True when both slots hold the same asset
    pub fn is_degenerate(&self) -> bool {
        self.lower == self.upper
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}/{:#x}", self.lower.0, self.upper.0)
    }
}
