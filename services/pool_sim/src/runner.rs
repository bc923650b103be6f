//! Script runner
//!
//! Replays a [`Script`] against a fresh [`PoolEngine`] backed by an in-memory
//! vault and a manual clock. A failing step is reported and the run goes on.

use crate::script::{Names, Script, Step};
use anyhow::{Context, Result};
use pool_engine::{
    AccountId, AddLiquidity, Clock, EngineSettings, ManualClock, MemoryVault, PoolEngine, PoolError,
    RemoveLiquidity, SwapExactIn, SystemClock, U256,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

const CUSTODY: u64 = 0xc0570d;

/// Outcome of one script step, printed as a JSON line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final state of one pool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolSummary {
    pub pair: String,
    pub reserves: [String; 2],
    pub claim_supply: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub steps: usize,
    pub failed: usize,
    pub events: usize,
    pub pools: Vec<PoolSummary>,
}

pub struct Simulator {
    engine: PoolEngine<Arc<MemoryVault>, Arc<ManualClock>>,
    vault: Arc<MemoryVault>,
    clock: Arc<ManualClock>,
    names: Names,
}

impl Simulator {
    pub fn new(settings: EngineSettings, start_time: Option<u64>) -> Self {
        let vault = Arc::new(MemoryVault::new(AccountId::from_low_u64(CUSTODY)));
        let clock = Arc::new(ManualClock::new(
            start_time.unwrap_or_else(|| SystemClock.now()),
        ));
        Self {
            engine: PoolEngine::new(settings, vault.clone(), clock.clone()),
            vault,
            clock,
            names: Names::default(),
        }
    }

    /// Fund accounts and replay every step, calling `emit` after each one
    pub fn run(
        &mut self,
        script: &Script,
        mut emit: impl FnMut(&StepOutcome) -> Result<()>,
    ) -> Result<RunSummary> {
        for funding in &script.funding {
            let asset = self.names.asset(&funding.asset);
            let account = self.names.account(&funding.account);
            self.vault
                .credit(asset, account, U256::from(funding.amount))
                .with_context(|| {
                    format!("Failed to fund {} with {}", funding.account, funding.asset)
                })?;
        }
        info!(
            "Funded {} balances, replaying {} steps",
            script.funding.len(),
            script.steps.len()
        );

        let mut failed = 0;
        for (index, step) in script.steps.iter().enumerate() {
            let outcome = match self.apply(step) {
                Ok(result) => StepOutcome {
                    step: index,
                    op: step.op(),
                    result: Some(result),
                    error: None,
                },
                Err(err) => {
                    failed += 1;
                    StepOutcome {
                        step: index,
                        op: step.op(),
                        result: None,
                        error: Some(err.to_string()),
                    }
                }
            };
            debug!("Step {} ({}): {:?}", index, step.op(), outcome);
            emit(&outcome)?;
        }

        if failed > 0 {
            warn!("{} of {} steps failed", failed, script.steps.len());
        }

        Ok(RunSummary {
            steps: script.steps.len(),
            failed,
            events: self.engine.drain_events().len(),
            pools: self.pools(),
        })
    }

    fn apply(&mut self, step: &Step) -> Result<Value, PoolError> {
        let value = match step {
            Step::AddLiquidity {
                sender,
                asset_a,
                asset_b,
                amount_a_desired,
                amount_b_desired,
                amount_a_min,
                amount_b_min,
                to,
                deadline,
            } => {
                let sender = self.names.account(sender);
                let request = AddLiquidity {
                    asset_a: self.names.asset(asset_a),
                    asset_b: self.names.asset(asset_b),
                    amount_a_desired: U256::from(*amount_a_desired),
                    amount_b_desired: U256::from(*amount_b_desired),
                    amount_a_min: U256::from(*amount_a_min),
                    amount_b_min: U256::from(*amount_b_min),
                    to: self.recipient(to.as_deref(), sender),
                    deadline: *deadline,
                };
                let added = self.engine.add_liquidity(sender, request)?;
                json!({
                    "amount_a": added.amount_a.to_string(),
                    "amount_b": added.amount_b.to_string(),
                    "liquidity": added.liquidity.to_string(),
                })
            }
            Step::RemoveLiquidity {
                sender,
                asset_a,
                asset_b,
                liquidity,
                amount_a_min,
                amount_b_min,
                to,
                deadline,
            } => {
                let sender = self.names.account(sender);
                let request = RemoveLiquidity {
                    asset_a: self.names.asset(asset_a),
                    asset_b: self.names.asset(asset_b),
                    liquidity: U256::from(*liquidity),
                    amount_a_min: U256::from(*amount_a_min),
                    amount_b_min: U256::from(*amount_b_min),
                    to: self.recipient(to.as_deref(), sender),
                    deadline: *deadline,
                };
                let removed = self.engine.remove_liquidity(sender, request)?;
                json!({
                    "amount_a": removed.amount_a.to_string(),
                    "amount_b": removed.amount_b.to_string(),
                })
            }
            Step::Swap {
                sender,
                asset_in,
                asset_out,
                amount_in,
                amount_out_min,
                to,
                deadline,
            } => {
                let sender = self.names.account(sender);
                let request = SwapExactIn {
                    asset_in: self.names.asset(asset_in),
                    asset_out: self.names.asset(asset_out),
                    amount_in: U256::from(*amount_in),
                    amount_out_min: U256::from(*amount_out_min),
                    to: self.recipient(to.as_deref(), sender),
                    deadline: *deadline,
                };
                let amount_out = self.engine.swap_exact_tokens_for_tokens(sender, request)?;
                json!({ "amount_out": amount_out.to_string() })
            }
            Step::Price { asset_a, asset_b } => {
                let (a_in_b, b_in_a) = self
                    .engine
                    .get_price(self.names.asset(asset_a), self.names.asset(asset_b))?;
                json!({
                    "price_a_in_b": a_in_b.to_string(),
                    "price_b_in_a": b_in_a.to_string(),
                })
            }
            Step::AmountOut {
                amount_in,
                asset_in,
                asset_out,
            } => {
                let amount_out = self.engine.get_amount_out(
                    U256::from(*amount_in),
                    self.names.asset(asset_in),
                    self.names.asset(asset_out),
                )?;
                json!({ "amount_out": amount_out.to_string() })
            }
            Step::Reserves { asset_a, asset_b } => {
                let reserves = self
                    .engine
                    .get_reserves(self.names.asset(asset_a), self.names.asset(asset_b));
                json!({
                    "reserve_a": reserves.reserve_a.to_string(),
                    "reserve_b": reserves.reserve_b.to_string(),
                })
            }
            Step::AdvanceClock { seconds } => {
                self.clock.advance(*seconds);
                json!({ "now": self.clock.now() })
            }
            Step::Freeze { asset } => {
                self.vault.freeze(self.names.asset(asset));
                json!({ "frozen": asset })
            }
            Step::Unfreeze { asset } => {
                self.vault.unfreeze(self.names.asset(asset));
                json!({ "unfrozen": asset })
            }
        };
        Ok(value)
    }

    fn recipient(&mut self, to: Option<&str>, sender: AccountId) -> AccountId {
        to.map(|name| self.names.account(name)).unwrap_or(sender)
    }

    fn pools(&self) -> Vec<PoolSummary> {
        self.engine
            .pairs()
            .into_iter()
            .map(|key| {
                let reserves = self.engine.get_reserves(key.lower(), key.upper());
                PoolSummary {
                    pair: format!(
                        "{}/{}",
                        self.names.asset_name(key.lower()),
                        self.names.asset_name(key.upper())
                    ),
                    reserves: [reserves.reserve_a.to_string(), reserves.reserve_b.to_string()],
                    claim_supply: self
                        .engine
                        .claim_total_supply(key.lower(), key.upper())
                        .to_string(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "start_time": 1700000000,
        "funding": [
            { "account": "alice", "asset": "USDC", "amount": 100000 },
            { "account": "alice", "asset": "WETH", "amount": 100000 },
            { "account": "bob", "asset": "USDC", "amount": 1000 }
        ],
        "steps": [
            { "add_liquidity": { "sender": "alice", "asset_a": "USDC", "asset_b": "WETH",
                "amount_a_desired": 1000, "amount_b_desired": 4000 } },
            { "add_liquidity": { "sender": "alice", "asset_a": "USDC", "asset_b": "WETH",
                "amount_a_desired": 500, "amount_b_desired": 3000 } },
            { "amount_out": { "amount_in": 100, "asset_in": "USDC", "asset_out": "WETH" } },
            { "swap": { "sender": "bob", "asset_in": "USDC", "asset_out": "WETH",
                "amount_in": 100, "amount_out_min": 375 } },
            { "swap": { "sender": "bob", "asset_in": "USDC", "asset_out": "USDC",
                "amount_in": 1 } },
            { "advance_clock": { "seconds": 120 } },
            { "swap": { "sender": "bob", "asset_in": "USDC", "asset_out": "WETH",
                "amount_in": 1, "deadline": { "at": 1700000060 } } },
            { "remove_liquidity": { "sender": "alice", "asset_a": "WETH", "asset_b": "USDC",
                "liquidity": 1000 } }
        ]
    }"#;

    fn run(script: &str) -> (Vec<StepOutcome>, RunSummary) {
        let script = Script::from_json(script).unwrap();
        let mut simulator = Simulator::new(EngineSettings::default(), script.start_time);
        let mut outcomes = Vec::new();
        let summary = simulator
            .run(&script, |outcome| {
                outcomes.push(outcome.clone());
                Ok(())
            })
            .unwrap();
        (outcomes, summary)
    }

    #[test]
    fn test_replays_pool_lifecycle() {
        let (outcomes, summary) = run(SCRIPT);

        assert_eq!(
            outcomes[0].result,
            Some(json!({ "amount_a": "1000", "amount_b": "4000", "liquidity": "2000" }))
        );
        assert_eq!(
            outcomes[1].result,
            Some(json!({ "amount_a": "500", "amount_b": "2000", "liquidity": "1000" }))
        );
        assert_eq!(outcomes[2].result, Some(json!({ "amount_out": "375" })));
        assert_eq!(outcomes[3].result, Some(json!({ "amount_out": "375" })));
        // (1600, 5625) with 3000 claims outstanding
        assert_eq!(
            outcomes[7].result,
            Some(json!({ "amount_a": "1875", "amount_b": "533" }))
        );

        assert_eq!(summary.steps, 8);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.pools.len(), 1);
        assert_eq!(summary.pools[0].claim_supply, "2000");
    }

    #[test]
    fn test_failed_steps_report_errors() {
        let (outcomes, _) = run(SCRIPT);

        assert_eq!(outcomes[4].op, "swap");
        assert!(outcomes[4].result.is_none());
        assert!(outcomes[4].error.as_deref().unwrap().contains("invalid pair"));
        assert!(outcomes[6].error.as_deref().unwrap().contains("expired"));
        assert_eq!(outcomes[5].result, Some(json!({ "now": 1_700_000_120u64 })));
    }

    #[test]
    fn test_frozen_asset_fails_transfer() {
        let (outcomes, summary) = run(
            r#"{
                "start_time": 0,
                "funding": [
                    { "account": "alice", "asset": "A", "amount": 10 },
                    { "account": "alice", "asset": "B", "amount": 10 }
                ],
                "steps": [
                    { "freeze": { "asset": "B" } },
                    { "add_liquidity": { "sender": "alice", "asset_a": "A", "asset_b": "B",
                        "amount_a_desired": 4, "amount_b_desired": 9 } },
                    { "unfreeze": { "asset": "B" } },
                    { "add_liquidity": { "sender": "alice", "asset_a": "A", "asset_b": "B",
                        "amount_a_desired": 4, "amount_b_desired": 9 } }
                ]
            }"#,
        );

        assert!(outcomes[1].error.is_some());
        assert_eq!(
            outcomes[3].result,
            Some(json!({ "amount_a": "4", "amount_b": "9", "liquidity": "6" }))
        );
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.events, 2);
    }
}
