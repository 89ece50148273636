//! Run command implementation

use super::connect_market;
use crate::config::Config;
use crate::engine::{Clock, Engine, EquitySnapshot, SystemClock};
use crate::execution::{ExecutionVenue, PaperVenue};
use anyhow::Context;
use clap::Args;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Stop after this many cycles
    #[arg(long)]
    pub max_cycles: Option<u64>,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let (gate, stream_task) = connect_market(config)?;
        let venue = PaperVenue::new(config.execution.initial_equity, config.execution.fee_rate);
        let clock = SystemClock;

        let equity = venue
            .equity()
            .await
            .context("querying starting equity")?;
        let baseline = EquitySnapshot::new(equity, clock.now());

        tracing::info!(
            symbol = %config.instrument.symbol,
            interval = %config.instrument.candle_interval,
            equity = %baseline.equity,
            max_cycles = ?self.max_cycles,
            "Starting paper trading"
        );

        let mut engine = Engine::new(
            gate,
            venue,
            clock,
            config.risk.clone(),
            config.engine.clone(),
            baseline,
        );

        tokio::select! {
            _ = async {
                match self.max_cycles {
                    Some(cycles) => engine.run_for(cycles).await,
                    None => engine.run().await,
                }
            } => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
            }
        }

        stream_task.abort();
        Ok(())
    }
}
