//! Constant-product AMM math with exact integer arithmetic
//!
//! Zero-fee x*y=k formulas. All divisions floor, so every rounding error
//! stays in the pool.

use crate::sqrt::integer_sqrt;
use crate::PRICE_SCALE;
use pool_types::{OrientedReserves, U256};
use thiserror::Error;

/// Failures of the pure math layer
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Intermediate value does not fit in 256 bits
    #[error("overflow computing {0}")]
    Overflow(&'static str),

    /// Divisor reserve or supply is zero
    #[error("division by zero computing {0}")]
    DivisionByZero(&'static str),
}

/// Integer constant-product formulas
pub struct V2Math;

impl V2Math {
    /// Output amount for an exact input under x*y=k, no fee
    ///
    /// `amount_out = amount_in * reserve_out / (reserve_in + amount_in)`
    pub fn get_amount_out(
        amount_in: U256,
        reserve_in: U256,
        reserve_out: U256,
    ) -> Result<U256, MathError> {
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(MathError::DivisionByZero("amount_out"));
        }

        let numerator = amount_in
            .checked_mul(reserve_out)
            .ok_or(MathError::Overflow("amount_out"))?;
        let denominator = reserve_in
            .checked_add(amount_in)
            .ok_or(MathError::Overflow("amount_out"))?;

        Ok(numerator / denominator)
    }

    /// Amount of B matching `amount_a` at the current reserve ratio
    ///
    /// `amount_b = amount_a * reserve_b / reserve_a`
    pub fn quote(amount_a: U256, reserve_a: U256, reserve_b: U256) -> Result<U256, MathError> {
        if reserve_a.is_zero() {
            return Err(MathError::DivisionByZero("quote"));
        }
        let numerator = amount_a
            .checked_mul(reserve_b)
            .ok_or(MathError::Overflow("quote"))?;
        Ok(numerator / reserve_a)
    }

    /// Amounts actually taken from a deposit of up to `(desired_a, desired_b)`
    ///
    /// An empty pool accepts both desired amounts and takes its price from
    /// them. Otherwise A is used in full if the matching B fits inside
    /// `desired_b`; if not, B is used in full and A is quoted from it.
    pub fn optimal_deposit(
        desired_a: U256,
        desired_b: U256,
        reserves: OrientedReserves,
    ) -> Result<(U256, U256), MathError> {
        if reserves.reserve_a.is_zero() && reserves.reserve_b.is_zero() {
            return Ok((desired_a, desired_b));
        }

        let optimal_b = Self::quote(desired_a, reserves.reserve_a, reserves.reserve_b)?;
        if optimal_b <= desired_b {
            return Ok((desired_a, optimal_b));
        }

        let optimal_a = Self::quote(desired_b, reserves.reserve_b, reserves.reserve_a)?;
        Ok((optimal_a, desired_b))
    }

    /// Claim tokens minted for a deposit: `floor(sqrt(amount_a * amount_b))`
    pub fn liquidity_for(amount_a: U256, amount_b: U256) -> Result<U256, MathError> {
        let product = amount_a
            .checked_mul(amount_b)
            .ok_or(MathError::Overflow("liquidity"))?;
        Ok(integer_sqrt(product))
    }

    /// Share of each reserve owed for burning `liquidity` out of `total_supply`
    pub fn withdrawal_amounts(
        liquidity: U256,
        total_supply: U256,
        reserves: OrientedReserves,
    ) -> Result<(U256, U256), MathError> {
        if total_supply.is_zero() {
            return Err(MathError::DivisionByZero("withdrawal"));
        }
        let amount_a = liquidity
            .checked_mul(reserves.reserve_a)
            .ok_or(MathError::Overflow("withdrawal"))?
            / total_supply;
        let amount_b = liquidity
            .checked_mul(reserves.reserve_b)
            .ok_or(MathError::Overflow("withdrawal"))?
            / total_supply;
        Ok((amount_a, amount_b))
    }

    /// Price of one unit of "self" in "other", scaled by 1e18
    ///
    /// `reserve_other * 1e18 / reserve_self`
    pub fn scaled_price(reserve_self: U256, reserve_other: U256) -> Result<U256, MathError> {
        if reserve_self.is_zero() {
            return Err(MathError::DivisionByZero("price"));
        }
        let numerator = reserve_other
            .checked_mul(U256::from(PRICE_SCALE))
            .ok_or(MathError::Overflow("price"))?;
        Ok(numerator / reserve_self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn test_v2_output_calculation() {
        // 100 in against 1500:6000 -> 100*6000/1600 = 375
        let out = V2Math::get_amount_out(u(100), u(1500), u(6000)).unwrap();
        assert_eq!(out, u(375));

        // 100 in against 1000:2000 -> 200000/1100 = 181.8 -> 181
        let out = V2Math::get_amount_out(u(100), u(1000), u(2000)).unwrap();
        assert_eq!(out, u(181));
    }

    #[test]
    fn test_output_never_drains_reserve() {
        let out = V2Math::get_amount_out(U256::from(u128::MAX), u(1), u(1000)).unwrap();
        assert!(out < u(1000));
    }

    #[test]
    fn test_output_rejects_empty_reserves() {
        assert_eq!(
            V2Math::get_amount_out(u(1), u(0), u(10)),
            Err(MathError::DivisionByZero("amount_out"))
        );
    }

    #[test]
    fn test_output_overflow_is_reported() {
        assert_eq!(
            V2Math::get_amount_out(U256::MAX, u(1), u(2)),
            Err(MathError::Overflow("amount_out"))
        );
    }

    #[test]
    fn test_optimal_deposit_empty_pool_takes_desired() {
        let (a, b) = V2Math::optimal_deposit(u(1000), u(4000), OrientedReserves::default()).unwrap();
        assert_eq!((a, b), (u(1000), u(4000)));
    }

    #[test]
    fn test_optimal_deposit_uses_all_of_a_when_b_fits() {
        let reserves = OrientedReserves::new(u(1000), u(4000));
        let (a, b) = V2Math::optimal_deposit(u(500), u(3000), reserves).unwrap();
        assert_eq!((a, b), (u(500), u(2000)));
    }

    #[test]
    fn test_optimal_deposit_falls_back_to_all_of_b() {
        let reserves = OrientedReserves::new(u(1000), u(4000));
        // optimal_b = 500*4000/1000 = 2000 > 1000 -> optimal_a = 1000*1000/4000 = 250
        let (a, b) = V2Math::optimal_deposit(u(500), u(1000), reserves).unwrap();
        assert_eq!((a, b), (u(250), u(1000)));
    }

    #[test]
    fn test_quote_truncates() {
        assert_eq!(V2Math::quote(u(10), u(3), u(1)).unwrap(), u(3));
    }

    #[test]
    fn test_withdrawal_amounts_are_proportional() {
        let reserves = OrientedReserves::new(u(1000), u(2000));
        let (a, b) = V2Math::withdrawal_amounts(u(100), u(1000), reserves).unwrap();
        assert_eq!((a, b), (u(100), u(200)));

        assert_eq!(
            V2Math::withdrawal_amounts(u(100), u(0), reserves),
            Err(MathError::DivisionByZero("withdrawal"))
        );
    }

    #[test]
    fn test_scaled_price() {
        let price = V2Math::scaled_price(u(1000), u(4000)).unwrap();
        assert_eq!(price, u(4) * U256::from(PRICE_SCALE));

        let inverse = V2Math::scaled_price(u(4000), u(1000)).unwrap();
        assert_eq!(inverse, U256::from(PRICE_SCALE / 4));
    }

    #[test]
    fn test_liquidity_for() {
        assert_eq!(V2Math::liquidity_for(u(1000), u(4000)).unwrap(), u(2000));
        assert_eq!(
            V2Math::liquidity_for(U256::MAX, u(2)),
            Err(MathError::Overflow("liquidity"))
        );
    }
}
