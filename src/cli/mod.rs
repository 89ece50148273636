//! CLI interface for liq-hunter
//!
//! Provides subcommands for:
//! - `run`: Start the paper trading loop
//! - `check`: Evaluate the current market once without trading
//! - `config`: Print the effective configuration

mod check;
mod run;

pub use check::CheckArgs;
pub use run::RunArgs;

use crate::config::Config;
use crate::market::{BybitClient, BybitConfig, LiquidationBuffer, LiquidationStream};
use clap::{Parser, Subcommand};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Parser, Debug)]
#[command(name = "liq-hunter")]
#[command(about = "Liquidation-cluster momentum trader for a single Bybit perpetual")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start paper trading
    Run(RunArgs),
    /// Evaluate once and print features and signal
    Check(CheckArgs),
    /// Show the effective configuration
    Config,
}

/// Start the liquidation stream and build the REST gate reading from it
fn connect_market(config: &Config) -> anyhow::Result<(BybitClient, JoinHandle<()>)> {
    let buffer = LiquidationBuffer::new(
        config.engine.liquidation_lookback(),
        config.venue.liquidation_buffer_capacity,
    );
    let stream = LiquidationStream::new(
        config.venue.ws_url.as_str(),
        config.instrument.symbol.as_str(),
        buffer.clone(),
    );
    let stream_task = stream.spawn();

    let client = BybitClient::new(
        BybitConfig {
            base_url: config.venue.rest_url.clone(),
            category: config.instrument.category.clone(),
            symbol: config.instrument.symbol.clone(),
            interval: config.instrument.candle_interval.clone(),
            timeout: Duration::from_secs(config.venue.timeout_secs),
        },
        buffer,
    )?;

    Ok((client, stream_task))
}
