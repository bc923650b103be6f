//! Pool trait definitions for a caller-oriented AMM view

use crate::{MathError, V2Math};
use pool_types::{OrientedReserves, U256};

/// Constant-product pricing seen from the asset the caller named first
pub trait AmmPool {
    /// Output of B for an exact input of A
    fn get_amount_out(&self, amount_in: U256) -> Result<U256, MathError>;

    /// B matching `amount_a` at the current ratio
    fn quote(&self, amount_a: U256) -> Result<U256, MathError>;

    /// `(price of A in B, price of B in A)`, each scaled by 1e18
    fn prices(&self) -> Result<(U256, U256), MathError>;
}

impl AmmPool for OrientedReserves {
    fn get_amount_out(&self, amount_in: U256) -> Result<U256, MathError> {
        V2Math::get_amount_out(amount_in, self.reserve_a, self.reserve_b)
    }

    fn quote(&self, amount_a: U256) -> Result<U256, MathError> {
        V2Math::quote(amount_a, self.reserve_a, self.reserve_b)
    }

    fn prices(&self) -> Result<(U256, U256), MathError> {
        Ok((
            V2Math::scaled_price(self.reserve_a, self.reserve_b)?,
            V2Math::scaled_price(self.reserve_b, self.reserve_a)?,
        ))
    }
}
