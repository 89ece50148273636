//! Check command implementation

use super::connect_market;
use crate::config::Config;
use crate::engine::{Clock, Engine, EquitySnapshot, SystemClock};
use crate::execution::PaperVenue;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Seconds to collect liquidations before evaluating
    #[arg(long, default_value_t = 0)]
    pub listen_secs: u64,
}

impl CheckArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let (gate, stream_task) = connect_market(config)?;
        if self.listen_secs > 0 {
            tracing::info!(secs = self.listen_secs, "Collecting liquidations");
            tokio::time::sleep(Duration::from_secs(self.listen_secs)).await;
        }

        let clock = SystemClock;
        let baseline = EquitySnapshot::new(config.execution.initial_equity, clock.now());
        let engine = Engine::new(
            gate,
            PaperVenue::new(config.execution.initial_equity, config.execution.fee_rate),
            clock,
            config.risk.clone(),
            config.engine.clone(),
            baseline,
        );

        let result = engine.evaluate_once().await;
        stream_task.abort();
        let (features, signal) = result?;

        println!("{} ({})", config.instrument.symbol, config.instrument.category);
        println!("  Price:        {}", features.current_price);
        println!("  RSI:          {}", features.rsi.round_dp(2));
        println!("  Volume ratio: {}", features.volume_ratio.round_dp(2));
        println!("  Support:      {}", display_level(features.levels.support));
        println!("  Resistance:   {}", display_level(features.levels.resistance));
        println!(
            "  Signal:       {:?} (confidence {}) {}",
            signal.direction, signal.confidence, signal.rationale
        );

        Ok(())
    }
}

fn display_level(level: Option<rust_decimal::Decimal>) -> String {
    level.map_or_else(|| "-".to_string(), |l| l.to_string())
}
