//! Pool Simulator
//!
//! Replays a JSON script of deposits, swaps and withdrawals against an
//! in-memory pool engine and prints one JSON line per step.

mod runner;
mod script;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pool_config::{EngineConfig, LoggingConfig};
use runner::Simulator;
use script::Script;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pool-sim")]
#[command(about = "Constant-product pool simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a script and print each step's outcome
    Run {
        /// Script file (JSON)
        #[arg(short, long)]
        script: PathBuf,

        /// Engine configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Enable debug logging
        #[arg(short, long)]
        debug: bool,
    },
    /// Print the default configuration as TOML
    DefaultConfig,
}

fn init_logging(logging: &LoggingConfig, debug: bool) {
    let level = if debug { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the step outcomes
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(script_path: PathBuf, config_path: Option<PathBuf>, debug: bool) -> Result<()> {
    let config = EngineConfig::load(config_path.as_deref())?;
    init_logging(&config.logging, debug);
    info!(
        "Engine settings: claim scope {:?}, distinct liquidity assets {}",
        config.engine.claim_scope, config.engine.require_distinct_liquidity_assets
    );

    let script = Script::from_file(&script_path)?;
    let mut simulator = Simulator::new(config.engine, script.start_time);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = simulator.run(&script, |outcome| {
        serde_json::to_writer(&mut out, outcome)?;
        writeln!(out)?;
        Ok(())
    })?;

    serde_json::to_writer_pretty(&mut out, &summary)?;
    writeln!(out)?;

    info!(
        "Replayed {} steps from {:?}: {} failed, {} events",
        summary.steps, script_path, summary.failed, summary.events
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            script,
            config,
            debug,
        } => run(script, config, debug),
        Command::DefaultConfig => {
            print!("{}", EngineConfig::default().to_toml()?);
            Ok(())
        }
    }
}
