//! Engine Configuration Module
//!
//! Loads [`EngineConfig`] from a TOML file with environment overrides.
//! Missing keys fall back to [`EngineConfig::default`].

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Default config file location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/engine.toml";

/// Prefix for environment overrides, e.g. `POOL__ENGINE__CLAIM_SCOPE=global`
pub const ENV_PREFIX: &str = "POOL";

/// Complete engine configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Pool accounting behaviour
    pub engine: EngineSettings,

    /// Log output
    pub logging: LoggingConfig,
}

/// How claim tokens are partitioned across pools
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClaimScope {
    /// One supply and balance book shared by every pool
    Global,
    /// An independent book per pair
    #[default]
    PerPool,
}

/// Pool accounting switches
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub claim_scope: ClaimScope,

    /// Reject `add_liquidity` when both assets are the same
    pub require_distinct_liquidity_assets: bool,
}

/// Log output settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `pool_engine=debug`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            claim_scope: ClaimScope::PerPool,
            require_distinct_liquidity_assets: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a file with environment overrides
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
    /// used when present and skipped otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// [`EngineConfig::load`] reading overrides from `{prefix}__...` variables
    pub fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                info!("Loading engine config: {:?}", path);
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    info!("Loading engine config: {:?}", default_path);
                    builder = builder.add_source(File::from(default_path));
                } else {
                    warn!(
                        "Engine config not found at {:?}, using defaults",
                        default_path
                    );
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        debug!("Engine config: {:?}", config);
        Ok(config)
    }

    /// Render as TOML, e.g. to seed a config file
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
