//! Price Query

use crate::engine::{math_error, PoolEngine};
use pool_amm::AmmPool;
use pool_state::{AssetTransfer, Clock};
use pool_types::{AssetId, PairKey, PoolError, U256};

impl<T: AssetTransfer, C: Clock> PoolEngine<T, C> {
    /// `(price of A in B, price of B in A)`, each scaled by 1e18
    ///
    /// Oriented by argument order, not canonical order.
    pub fn get_price(&self, asset_a: AssetId, asset_b: AssetId) -> Result<(U256, U256), PoolError> {
        if asset_a == asset_b {
            return Err(PoolError::InvalidPair(asset_a));
        }

        let key = PairKey::new(asset_a, asset_b);
        let reserve = self.state.read().reserves.get(&key);
        if reserve.has_zero_side() {
            return Err(PoolError::EmptyPool(key));
        }

        reserve.oriented(&key, asset_a).prices().map_err(math_error(key))
    }
}
