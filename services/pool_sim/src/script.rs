//! Simulation script format
//!
//! Each step is an object keyed by its operation name, e.g.
//! `{ "swap": { "sender": "bob", ... } }`. Scripts name assets and accounts
//! with plain strings ("USDC", "alice").
//! [`Names`] hands each new name a stable identifier in order of first use.

use anyhow::{Context, Result};
use pool_engine::{AccountId, AssetId, Deadline};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const ASSET_BASE: u64 = 0x1_0000;
const ACCOUNT_BASE: u64 = 0x2_0000;

fn default_deadline() -> Deadline {
    Deadline::Within(300)
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Unix time the simulated clock starts at; wall clock when absent
    #[serde(default)]
    pub start_time: Option<u64>,
    #[serde(default)]
    pub funding: Vec<Funding>,
    pub steps: Vec<Step>,
}

/// Balance credited before the first step
#[derive(Debug, Clone, Deserialize)]
pub struct Funding {
    pub account: String,
    pub asset: String,
    pub amount: u128,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    AddLiquidity {
        sender: String,
        asset_a: String,
        asset_b: String,
        amount_a_desired: u128,
        amount_b_desired: u128,
        #[serde(default)]
        amount_a_min: u128,
        #[serde(default)]
        amount_b_min: u128,
        /// Recipient of the claim tokens; the sender when absent
        #[serde(default)]
        to: Option<String>,
        #[serde(default = "default_deadline")]
        deadline: Deadline,
    },
    RemoveLiquidity {
        sender: String,
        asset_a: String,
        asset_b: String,
        liquidity: u128,
        #[serde(default)]
        amount_a_min: u128,
        #[serde(default)]
        amount_b_min: u128,
        #[serde(default)]
        to: Option<String>,
        #[serde(default = "default_deadline")]
        deadline: Deadline,
    },
    Swap {
        sender: String,
        asset_in: String,
        asset_out: String,
        amount_in: u128,
        #[serde(default)]
        amount_out_min: u128,
        #[serde(default)]
        to: Option<String>,
        #[serde(default = "default_deadline")]
        deadline: Deadline,
    },
    Price {
        asset_a: String,
        asset_b: String,
    },
    AmountOut {
        amount_in: u128,
        asset_in: String,
        asset_out: String,
    },
    Reserves {
        asset_a: String,
        asset_b: String,
    },
    AdvanceClock {
        seconds: u64,
    },
    /// Make the vault reject every transfer of `asset`
    Freeze {
        asset: String,
    },
    Unfreeze {
        asset: String,
    },
}

impl Step {
    pub fn op(&self) -> &'static str {
        match self {
            Step::AddLiquidity { .. } => "add_liquidity",
            Step::RemoveLiquidity { .. } => "remove_liquidity",
            Step::Swap { .. } => "swap",
            Step::Price { .. } => "price",
            Step::AmountOut { .. } => "amount_out",
            Step::Reserves { .. } => "reserves",
            Step::AdvanceClock { .. } => "advance_clock",
            Step::Freeze { .. } => "freeze",
            Step::Unfreeze { .. } => "unfreeze",
        }
    }
}

impl Script {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse script {:?}", path))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Name registry for assets and accounts
#[derive(Debug, Default)]
pub struct Names {
    assets: BTreeMap<String, AssetId>,
    accounts: BTreeMap<String, AccountId>,
}

impl Names {
    pub fn asset(&mut self, name: &str) -> AssetId {
        let next = ASSET_BASE + self.assets.len() as u64;
        *self
            .assets
            .entry(name.to_string())
            .or_insert_with(|| AssetId::from_low_u64(next))
    }

    pub fn account(&mut self, name: &str) -> AccountId {
        let next = ACCOUNT_BASE + self.accounts.len() as u64;
        *self
            .accounts
            .entry(name.to_string())
            .or_insert_with(|| AccountId::from_low_u64(next))
    }

    /// Script name of `asset`, or its address if it was never named
    pub fn asset_name(&self, asset: AssetId) -> String {
        self.assets
            .iter()
            .find(|(_, id)| **id == asset)
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| asset.to_string())
    }
}
