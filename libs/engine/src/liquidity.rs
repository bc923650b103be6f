//! Liquidity Engine
//!
//! Deposits keep the existing reserve ratio (rounded down in the pool's
//! favour) and mint `floor(sqrt(amount_a * amount_b))` claim tokens on every
//! deposit, first or not. Withdrawals pay out
//! `liquidity * reserve / total_supply` per side, where `total_supply` is the
//! book selected by the claim scope.

use crate::engine::{checked_add, checked_sub, ensure_min, log_rejection, math_error, PoolEngine};
use crate::requests::{AddLiquidity, LiquidityAdded, LiquidityRemoved, RemoveLiquidity};
use pool_amm::V2Math;
use pool_state::{AssetTransfer, Clock, PoolEvent, TransferBatch};
use pool_types::{AccountId, OrientedReserves, PairKey, PoolError, Reserve, Side};
use tracing::{debug, info};

impl<T: AssetTransfer, C: Clock> PoolEngine<T, C> {
    /// Deposit into the A/B pool, creating it on first use
    ///
    /// Pulls `(amount_a, amount_b)` from `sender` and mints the claim tokens
    /// to `request.to`. Returns the amounts actually taken and the claim
    /// tokens minted.
    pub fn add_liquidity(
        &self,
        sender: AccountId,
        request: AddLiquidity,
    ) -> Result<LiquidityAdded, PoolError> {
        self.add_liquidity_inner(sender, request)
            .inspect_err(|err| log_rejection("add_liquidity", err))
    }

    /// Burn claim tokens held by `sender` for a share of the A/B pool
    ///
    /// Pushes both amounts to `request.to`. A pair with no reserves, whether
    /// never deposited into or fully drained, is rejected as `EmptyPool`.
    pub fn remove_liquidity(
        &self,
        sender: AccountId,
        request: RemoveLiquidity,
    ) -> Result<LiquidityRemoved, PoolError> {
        self.remove_liquidity_inner(sender, request)
            .inspect_err(|err| log_rejection("remove_liquidity", err))
    }

    fn add_liquidity_inner(
        &self,
        sender: AccountId,
        request: AddLiquidity,
    ) -> Result<LiquidityAdded, PoolError> {
        let AddLiquidity {
            asset_a,
            asset_b,
            amount_a_desired,
            amount_b_desired,
            amount_a_min,
            amount_b_min,
            to,
            deadline,
        } = request;

        let mut state = self.state.write();
        self.check_deadline(&deadline)?;

        if self.settings().require_distinct_liquidity_assets && asset_a == asset_b {
            return Err(PoolError::InvalidPair(asset_a));
        }

        let key = PairKey::new(asset_a, asset_b);
        let reserve = state.reserves.get(&key);
        let current = reserve.oriented(&key, asset_a);

        let (amount_a, amount_b) =
            V2Math::optimal_deposit(amount_a_desired, amount_b_desired, current)
                .map_err(math_error(key))?;
        debug!(
            "Deposit into {}: desired ({}, {}) -> taken ({}, {}) against reserves ({}, {})",
            key,
            amount_a_desired,
            amount_b_desired,
            amount_a,
            amount_b,
            current.reserve_a,
            current.reserve_b
        );

        ensure_min(Side::A, amount_a, amount_a_min)?;
        ensure_min(Side::B, amount_b, amount_b_min)?;

        let updated = OrientedReserves::new(
            checked_add(current.reserve_a, amount_a, "reserve")?,
            checked_add(current.reserve_b, amount_b, "reserve")?,
        );
        let liquidity = V2Math::liquidity_for(amount_a, amount_b).map_err(math_error(key))?;
        let ledger = self.ledger_key(key);
        state.claims.ensure_mintable(&ledger, liquidity)?;

        self.settle(
            &TransferBatch::new()
                .pull(asset_a, sender, amount_a)
                .pull(asset_b, sender, amount_b),
        )?;

        // Commit: every check that could fail has already passed
        let committed = Reserve::from_oriented(&key, asset_a, updated);
        state.reserves.set(key, committed);
        state.claims.mint(ledger, to, liquidity)?;

        if reserve.is_empty() && !committed.is_empty() {
            info!(
                "Pool {} activated: initial price set by {} at ({}, {})",
                key, sender, amount_a, amount_b
            );
        }
        info!(
            "Liquidity added to {}: ({}, {}) for {} claim tokens to {}",
            key, amount_a, amount_b, liquidity, to
        );

        let canonical = Reserve::from_oriented(
            &key,
            asset_a,
            OrientedReserves::new(amount_a, amount_b),
        );
        self.record([
            PoolEvent::Mint {
                pair: key,
                sender,
                to,
                amount_lower: canonical.reserve_lower,
                amount_upper: canonical.reserve_upper,
                liquidity,
            },
            PoolEvent::Sync {
                pair: key,
                reserve: committed,
            },
        ]);

        Ok(LiquidityAdded {
            amount_a,
            amount_b,
            liquidity,
        })
    }

    fn remove_liquidity_inner(
        &self,
        sender: AccountId,
        request: RemoveLiquidity,
    ) -> Result<LiquidityRemoved, PoolError> {
        let RemoveLiquidity {
            asset_a,
            asset_b,
            liquidity,
            amount_a_min,
            amount_b_min,
            to,
            deadline,
        } = request;

        let mut state = self.state.write();
        self.check_deadline(&deadline)?;

        if self.settings().require_distinct_liquidity_assets && asset_a == asset_b {
            return Err(PoolError::InvalidPair(asset_a));
        }

        let key = PairKey::new(asset_a, asset_b);
        let reserve = state.reserves.get(&key);
        // Only pools holding reserves can be withdrawn from
        if reserve.is_empty() {
            return Err(PoolError::EmptyPool(key));
        }
        let current = reserve.oriented(&key, asset_a);

        let ledger = self.ledger_key(key);
        state.claims.ensure_burnable(&ledger, &sender, liquidity)?;
        let total_supply = state.claims.total_supply(&ledger);

        let (amount_a, amount_b) = V2Math::withdrawal_amounts(liquidity, total_supply, current)
            .map_err(math_error(key))?;
        debug!(
            "Withdrawal from {}: {} of {} claim tokens -> ({}, {})",
            key, liquidity, total_supply, amount_a, amount_b
        );

        ensure_min(Side::A, amount_a, amount_a_min)?;
        ensure_min(Side::B, amount_b, amount_b_min)?;

        let updated = OrientedReserves::new(
            checked_sub(current.reserve_a, amount_a, "reserve")?,
            checked_sub(current.reserve_b, amount_b, "reserve")?,
        );

        self.settle(
            &TransferBatch::new()
                .push(asset_a, to, amount_a)
                .push(asset_b, to, amount_b),
        )?;

        state.claims.burn(ledger, sender, liquidity)?;
        let committed = Reserve::from_oriented(&key, asset_a, updated);
        state.reserves.set(key, committed);

        info!(
            "Liquidity removed from {}: {} claim tokens for ({}, {}) to {}",
            key, liquidity, amount_a, amount_b, to
        );

        let canonical = Reserve::from_oriented(
            &key,
            asset_a,
            OrientedReserves::new(amount_a, amount_b),
        );
        self.record([
            PoolEvent::Burn {
                pair: key,
                sender,
                to,
                amount_lower: canonical.reserve_lower,
                amount_upper: canonical.reserve_upper,
                liquidity,
            },
            PoolEvent::Sync {
                pair: key,
                reserve: committed,
            },
        ]);

        Ok(LiquidityRemoved { amount_a, amount_b })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        AccountId, AddLiquidity, AssetId, ClaimScope, Deadline, EngineSettings, ManualClock,
        MemoryVault, PairKey, PoolEngine, PoolError, PoolEvent, RemoveLiquidity, U256,
    };
    use pool_types::{Side, TransferError};
    use std::sync::Arc;

    const NOW: u64 = 1_700_000_000;

    struct Fixture {
        engine: PoolEngine<Arc<MemoryVault>, ManualClock>,
        vault: Arc<MemoryVault>,
        a: AssetId,
        b: AssetId,
        alice: AccountId,
    }

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    fn fixture(settings: EngineSettings) -> Fixture {
        let vault = Arc::new(MemoryVault::new(AccountId::from_low_u64(0xc0)));
        let a = AssetId::from_low_u64(0x20);
        let b = AssetId::from_low_u64(0x10);
        let alice = AccountId::from_low_u64(0xa);
        vault.credit(a, alice, u(1_000_000)).unwrap();
        vault.credit(b, alice, u(1_000_000)).unwrap();

        Fixture {
            engine: PoolEngine::new(settings, vault.clone(), ManualClock::new(NOW)),
            vault,
            a,
            b,
            alice,
        }
    }

    fn deposit(f: &Fixture, desired_a: u64, desired_b: u64) -> AddLiquidity {
        AddLiquidity {
            asset_a: f.a,
            asset_b: f.b,
            amount_a_desired: u(desired_a),
            amount_b_desired: u(desired_b),
            amount_a_min: U256::zero(),
            amount_b_min: U256::zero(),
            to: f.alice,
            deadline: Deadline::Within(600),
        }
    }

    fn withdrawal(f: &Fixture, liquidity: u64) -> RemoveLiquidity {
        RemoveLiquidity {
            asset_a: f.a,
            asset_b: f.b,
            liquidity: u(liquidity),
            amount_a_min: U256::zero(),
            amount_b_min: U256::zero(),
            to: f.alice,
            deadline: Deadline::Within(600),
        }
    }

    #[test]
    fn test_first_deposit_takes_desired_amounts() {
        let f = fixture(EngineSettings::default());

        let added = f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();

        assert_eq!((added.amount_a, added.amount_b), (u(1000), u(4000)));
        assert_eq!(added.liquidity, u(2000));
        let reserves = f.engine.get_reserves(f.a, f.b);
        assert_eq!((reserves.reserve_a, reserves.reserve_b), (u(1000), u(4000)));
        assert_eq!(f.engine.claim_balance_of(f.a, f.b, f.alice), u(2000));
        assert_eq!(f.vault.custody_balance(f.a), u(1000));
        assert_eq!(f.vault.custody_balance(f.b), u(4000));
    }

    #[test]
    fn test_second_deposit_keeps_ratio() {
        let f = fixture(EngineSettings::default());
        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();

        let added = f.engine.add_liquidity(f.alice, deposit(&f, 500, 3000)).unwrap();

        assert_eq!((added.amount_a, added.amount_b), (u(500), u(2000)));
        // sqrt(500 * 2000) = 1000
        assert_eq!(added.liquidity, u(1000));
        let reserves = f.engine.get_reserves(f.a, f.b);
        assert_eq!((reserves.reserve_a, reserves.reserve_b), (u(1500), u(6000)));
        assert_eq!(f.engine.claim_total_supply(f.a, f.b), u(3000));
    }

    #[test]
    fn test_reserves_stored_canonically() {
        let f = fixture(EngineSettings::default());
        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();

        // b sorts lower, so the reversed view is canonical
        let reversed = f.engine.get_reserves(f.b, f.a);
        assert_eq!((reversed.reserve_a, reversed.reserve_b), (u(4000), u(1000)));
        assert_eq!(
            f.engine.claim_balance_of(f.b, f.a, f.alice),
            f.engine.claim_balance_of(f.a, f.b, f.alice)
        );
    }

    #[test]
    fn test_slippage_guard_rejects_without_side_effects() {
        let f = fixture(EngineSettings::default());
        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();
        f.engine.drain_events();

        let mut request = deposit(&f, 500, 3000);
        request.amount_b_min = u(2500);
        let err = f.engine.add_liquidity(f.alice, request).unwrap_err();

        assert_eq!(
            err,
            PoolError::SlippageExceeded {
                side: Side::B,
                actual: u(2000),
                minimum: u(2500)
            }
        );
        let reserves = f.engine.get_reserves(f.a, f.b);
        assert_eq!((reserves.reserve_a, reserves.reserve_b), (u(1000), u(4000)));
        assert_eq!(f.vault.balance_of(f.a, f.alice), u(999_000));
        assert!(f.engine.drain_events().is_empty());
    }

    #[test]
    fn test_identical_assets_rejected_by_default() {
        let f = fixture(EngineSettings::default());
        let mut request = deposit(&f, 10, 10);
        request.asset_b = f.a;

        assert_eq!(
            f.engine.add_liquidity(f.alice, request),
            Err(PoolError::InvalidPair(f.a))
        );
    }

    #[test]
    fn test_identical_assets_form_self_pool_when_allowed() {
        let f = fixture(EngineSettings {
            require_distinct_liquidity_assets: false,
            ..EngineSettings::default()
        });
        let mut request = deposit(&f, 100, 400);
        request.asset_b = f.a;

        let added = f.engine.add_liquidity(f.alice, request).unwrap();

        assert_eq!(added.liquidity, u(200));
        assert_eq!(f.vault.custody_balance(f.a), u(500));
        assert!(f.engine.pairs()[0].is_degenerate());
    }

    #[test]
    fn test_failed_transfer_leaves_no_state() {
        let f = fixture(EngineSettings::default());
        f.vault.freeze(f.b);

        let err = f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap_err();

        assert!(matches!(
            err,
            PoolError::TransferFailed(TransferError::Rejected { .. })
        ));
        assert!(f.engine.pairs().is_empty());
        assert!(f.engine.claim_total_supply(f.a, f.b).is_zero());
        assert_eq!(f.vault.balance_of(f.a, f.alice), u(1_000_000));
    }

    #[test]
    fn test_expired_absolute_deadline() {
        let f = fixture(EngineSettings::default());
        let mut request = deposit(&f, 1000, 4000);
        request.deadline = Deadline::At(NOW - 1);

        assert_eq!(
            f.engine.add_liquidity(f.alice, request),
            Err(PoolError::Expired {
                now: NOW,
                deadline: NOW - 1
            })
        );
    }

    #[test]
    fn test_remove_returns_proportional_share() {
        let f = fixture(EngineSettings::default());
        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();
        f.engine.add_liquidity(f.alice, deposit(&f, 500, 3000)).unwrap();

        // 1000 of 3000 supply against (1500, 6000)
        let removed = f.engine.remove_liquidity(f.alice, withdrawal(&f, 1000)).unwrap();

        assert_eq!((removed.amount_a, removed.amount_b), (u(500), u(2000)));
        let reserves = f.engine.get_reserves(f.a, f.b);
        assert_eq!((reserves.reserve_a, reserves.reserve_b), (u(1000), u(4000)));
        assert_eq!(f.engine.claim_balance_of(f.a, f.b, f.alice), u(2000));
    }

    #[test]
    fn test_full_withdrawal_empties_pool_but_keeps_pair() {
        let f = fixture(EngineSettings::default());
        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();

        let removed = f.engine.remove_liquidity(f.alice, withdrawal(&f, 2000)).unwrap();

        assert_eq!((removed.amount_a, removed.amount_b), (u(1000), u(4000)));
        assert_eq!(f.engine.pool_status(f.a, f.b), crate::PoolStatus::Uninitialized);
        assert_eq!(f.engine.pairs().len(), 1);
        assert_eq!(f.vault.balance_of(f.a, f.alice), u(1_000_000));
    }

    #[test]
    fn test_remove_rejects_zero_and_excess_liquidity() {
        let f = fixture(EngineSettings::default());
        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();

        assert_eq!(
            f.engine.remove_liquidity(f.alice, withdrawal(&f, 0)),
            Err(PoolError::InsufficientBalance {
                requested: U256::zero(),
                available: u(2000)
            })
        );
        assert_eq!(
            f.engine.remove_liquidity(f.alice, withdrawal(&f, 2001)),
            Err(PoolError::InsufficientBalance {
                requested: u(2001),
                available: u(2000)
            })
        );
    }

    #[test]
    fn test_remove_slippage_guard() {
        let f = fixture(EngineSettings::default());
        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();

        let mut request = withdrawal(&f, 1000);
        request.amount_a_min = u(501);

        assert_eq!(
            f.engine.remove_liquidity(f.alice, request),
            Err(PoolError::SlippageExceeded {
                side: Side::A,
                actual: u(500),
                minimum: u(501)
            })
        );
        assert_eq!(f.engine.claim_balance_of(f.a, f.b, f.alice), u(2000));
    }

    #[test]
    fn test_global_scope_divides_by_supply_across_pools() {
        let f = fixture(EngineSettings {
            claim_scope: ClaimScope::Global,
            ..EngineSettings::default()
        });
        let c = AssetId::from_low_u64(0x30);
        f.vault.credit(c, f.alice, u(1_000_000)).unwrap();

        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();
        let mut other = deposit(&f, 900, 900);
        other.asset_b = c;
        f.engine.add_liquidity(f.alice, other).unwrap();

        // 2000 + 900 claims outstanding across both pools
        assert_eq!(f.engine.claim_total_supply(f.a, f.b), u(2900));

        // 2000 * 1000 / 2900 = 689, 2000 * 4000 / 2900 = 2758
        let removed = f.engine.remove_liquidity(f.alice, withdrawal(&f, 2000)).unwrap();
        assert_eq!((removed.amount_a, removed.amount_b), (u(689), u(2758)));
    }

    #[test]
    fn test_remove_rejects_pairs_without_reserves() {
        let f = fixture(EngineSettings {
            claim_scope: ClaimScope::Global,
            ..EngineSettings::default()
        });
        let c = AssetId::from_low_u64(0x30);
        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();
        f.engine.drain_events();

        let mut never_deposited = withdrawal(&f, 500);
        never_deposited.asset_b = c;
        assert_eq!(
            f.engine.remove_liquidity(f.alice, never_deposited),
            Err(PoolError::EmptyPool(PairKey::new(f.a, c)))
        );

        let mut same_asset = withdrawal(&f, 500);
        same_asset.asset_b = f.a;
        assert_eq!(
            f.engine.remove_liquidity(f.alice, same_asset),
            Err(PoolError::InvalidPair(f.a))
        );

        assert_eq!(f.engine.pairs(), vec![PairKey::new(f.a, f.b)]);
        assert_eq!(f.engine.claim_balance_of(f.a, f.b, f.alice), u(2000));
        assert!(f.engine.drain_events().is_empty());
    }

    #[test]
    fn test_remove_from_drained_pool_is_empty_pool() {
        let f = fixture(EngineSettings {
            claim_scope: ClaimScope::Global,
            ..EngineSettings::default()
        });
        let c = AssetId::from_low_u64(0x30);
        f.vault.credit(c, f.alice, u(1_000_000)).unwrap();
        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();
        let mut other = deposit(&f, 900, 900);
        other.asset_b = c;
        f.engine.add_liquidity(f.alice, other).unwrap();

        // Redeeming the whole global supply drains a/c
        let mut drain = withdrawal(&f, 2900);
        drain.asset_b = c;
        let removed = f.engine.remove_liquidity(f.alice, drain).unwrap();
        assert_eq!((removed.amount_a, removed.amount_b), (u(900), u(900)));

        let mut again = withdrawal(&f, 1);
        again.asset_b = c;
        assert_eq!(
            f.engine.remove_liquidity(f.alice, again),
            Err(PoolError::EmptyPool(PairKey::new(f.a, c)))
        );
    }

    #[test]
    fn test_events_recorded_for_commits() {
        let f = fixture(EngineSettings::default());
        f.engine.add_liquidity(f.alice, deposit(&f, 1000, 4000)).unwrap();
        f.engine.remove_liquidity(f.alice, withdrawal(&f, 500)).unwrap();

        let events = f.engine.drain_events();
        assert_eq!(events.len(), 4);
        match &events[0] {
            PoolEvent::Mint {
                amount_lower,
                amount_upper,
                liquidity,
                ..
            } => {
                // b sorts lower
                assert_eq!((*amount_lower, *amount_upper), (u(4000), u(1000)));
                assert_eq!(*liquidity, u(2000));
            }
            other => panic!("expected Mint, got {:?}", other),
        }
        assert!(matches!(events[2], PoolEvent::Burn { .. }));
        assert!(matches!(events[3], PoolEvent::Sync { .. }));
    }
}
