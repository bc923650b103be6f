//! # Tidepool Configuration
//!
//! Engine behaviour switches and logging settings, loaded from an optional
//! TOML file with `POOL__`-prefixed environment overrides.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pool_config::{ClaimScope, EngineConfig};
//!
//! let config = EngineConfig::load(None).unwrap();
//! if config.engine.claim_scope == ClaimScope::Global {
//!     // one claim-token supply shared by every pool
//! }
//! ```

pub mod engine_config;

pub use engine_config::{ClaimScope, EngineConfig, EngineSettings, LoggingConfig};
