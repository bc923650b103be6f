//! # Tidepool AMM Library - Integer Constant-Product Mathematics
//!
//! ## Purpose
//!
//! Pure, allocation-free math behind the pool engine: proportional deposit
//! quoting, zero-fee constant-product swap output, proportional withdrawal
//! shares, 1e18-scaled spot prices and the Newton integer square root used
//! for claim-token issuance.
//!
//! ## Arithmetic Rules
//!
//! - Every value is a `U256`; there is no floating point on any path
//! - Every multiplication and addition is checked and reports
//!   [`MathError::Overflow`] instead of wrapping or saturating
//! - Every division truncates toward zero, which always rounds in the
//!   pool's favour
//! - A zero divisor reports [`MathError::DivisionByZero`]; engines map it to
//!   an empty-pool rejection
//!
//! ## Architecture Role
//!
//! ```text
//! PoolEngine ──► AmmPool (OrientedReserves) ──► V2Math ──► integer_sqrt
//!   add/remove        caller-ordered view        formulas     share issuance
//!   swap/price
//! ```

pub mod pool_traits;
pub mod sqrt;
pub mod v2_math;

pub use pool_traits::AmmPool;
pub use sqrt::integer_sqrt;
pub use v2_math::{MathError, V2Math};

/// Fixed-point scale of prices returned by [`V2Math::scaled_price`]
pub const PRICE_SCALE: u64 = 1_000_000_000_000_000_000;
