//! Swap Engine
//!
//! Exact-input swaps along the zero-fee constant-product curve. The quoting
//! path and the mutating path share one pricing routine, so a quote taken
//! against a reserve state is exactly what a swap against the same state
//! pays out.

use crate::engine::{checked_add, checked_sub, ensure_min, log_rejection, math_error, PoolEngine};
use crate::requests::SwapExactIn;
use pool_amm::AmmPool;
use pool_state::{AssetTransfer, Clock, PoolEvent, PoolState, TransferBatch};
use pool_types::{AccountId, AssetId, OrientedReserves, PairKey, PoolError, Reserve, Side, U256};
use tracing::{debug, info};

/// A priced swap against one reserve state
struct PricedSwap {
    key: PairKey,
    /// Reserves oriented `(in, out)`
    current: OrientedReserves,
    amount_out: U256,
}

impl<T: AssetTransfer, C: Clock> PoolEngine<T, C> {
    /// Output `amount_in` of `asset_in` would buy at the current reserves
    pub fn get_amount_out(
        &self,
        amount_in: U256,
        asset_in: AssetId,
        asset_out: AssetId,
    ) -> Result<U256, PoolError> {
        let state = self.state.read();
        Self::price_swap(&state, amount_in, asset_in, asset_out).map(|priced| priced.amount_out)
    }

    /// Sell exactly `amount_in` of `asset_in` for as much `asset_out` as the curve gives
    ///
    /// Pulls the input from `sender`, pushes the output to `request.to` and
    /// returns the output amount.
    pub fn swap_exact_tokens_for_tokens(
        &self,
        sender: AccountId,
        request: SwapExactIn,
    ) -> Result<U256, PoolError> {
        self.swap_inner(sender, request)
            .inspect_err(|err| log_rejection("swap", err))
    }

    fn swap_inner(&self, sender: AccountId, request: SwapExactIn) -> Result<U256, PoolError> {
        let SwapExactIn {
            asset_in,
            asset_out,
            amount_in,
            amount_out_min,
            to,
            deadline,
        } = request;

        let mut state = self.state.write();
        self.check_deadline(&deadline)?;

        let PricedSwap {
            key,
            current,
            amount_out,
        } = Self::price_swap(&state, amount_in, asset_in, asset_out)?;
        ensure_min(Side::Out, amount_out, amount_out_min)?;

        let updated = OrientedReserves::new(
            checked_add(current.reserve_a, amount_in, "reserve")?,
            checked_sub(current.reserve_b, amount_out, "reserve")?,
        );

        self.settle(
            &TransferBatch::new()
                .pull(asset_in, sender, amount_in)
                .push(asset_out, to, amount_out),
        )?;

        let committed = Reserve::from_oriented(&key, asset_in, updated);
        state.reserves.set(key, committed);

        info!(
            "Swap on {}: {} {} in for {} {} out to {}",
            key, amount_in, asset_in, amount_out, asset_out, to
        );

        self.record([
            PoolEvent::Swap {
                pair: key,
                sender,
                to,
                asset_in,
                amount_in,
                amount_out,
            },
            PoolEvent::Sync {
                pair: key,
                reserve: committed,
            },
        ]);

        Ok(amount_out)
    }

    fn price_swap(
        state: &PoolState,
        amount_in: U256,
        asset_in: AssetId,
        asset_out: AssetId,
    ) -> Result<PricedSwap, PoolError> {
        if asset_in == asset_out {
            return Err(PoolError::InvalidPair(asset_in));
        }

        let key = PairKey::new(asset_in, asset_out);
        let reserve = state.reserves.get(&key);
        if reserve.has_zero_side() {
            return Err(PoolError::EmptyPool(key));
        }

        let current = reserve.oriented(&key, asset_in);
        let amount_out = current.get_amount_out(amount_in).map_err(math_error(key))?;
        debug!(
            "Priced {} in against ({}, {}) on {}: {} out",
            amount_in, current.reserve_a, current.reserve_b, key, amount_out
        );

        Ok(PricedSwap {
            key,
            current,
            amount_out,
        })
    }
}
