//! Configuration types for liq-hunter

use crate::features::LiquidationOrder;
use crate::market::{BYBIT_REST_URL, BYBIT_WS_URL};
use crate::telemetry::LogFormat;
use anyhow::{ensure, Context};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
///
/// `[instrument]` and every `[risk]` field are required; the other sections
/// fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub instrument: InstrumentConfig,
    pub risk: RiskParameters,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub venue: VenueConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Traded instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Venue symbol (e.g. "PEPEUSDT")
    pub symbol: String,
    /// Product category
    #[serde(default = "default_category")]
    pub category: String,
    /// Kline interval in venue notation ("5" = five minutes)
    #[serde(default = "default_candle_interval")]
    pub candle_interval: String,
}

fn default_category() -> String {
    "linear".to_string()
}
fn default_candle_interval() -> String {
    "5".to_string()
}

/// Strategy thresholds and risk fractions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    /// RSI lookback in candles
    pub rsi_length: usize,
    /// RSI below this is oversold
    pub rsi_oversold: Decimal,
    /// RSI above this is overbought
    pub rsi_overbought: Decimal,
    /// Volume ratio a long must exceed (shorts need 80% of it)
    pub vol_threshold: Decimal,
    /// Fraction of equity committed per trade, in (0, 1]
    pub risk_per_trade: Decimal,
    /// Take-profit distance as a fraction of entry price
    pub take_profit: Decimal,
    /// Stop-loss distance as a fraction of entry price
    pub stop_loss: Decimal,
}

impl RiskParameters {
    /// Reject values that make the strategy meaningless
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.rsi_length > 0, "risk.rsi_length must be at least 1");
        ensure!(
            self.rsi_oversold < self.rsi_overbought,
            "risk.rsi_oversold ({}) must be below risk.rsi_overbought ({})",
            self.rsi_oversold,
            self.rsi_overbought
        );
        ensure!(
            self.rsi_oversold >= Decimal::ZERO && self.rsi_overbought <= dec!(100),
            "RSI thresholds must lie within [0, 100]"
        );
        ensure!(
            self.vol_threshold >= Decimal::ZERO,
            "risk.vol_threshold must not be negative"
        );
        ensure!(
            self.risk_per_trade > Decimal::ZERO && self.risk_per_trade <= Decimal::ONE,
            "risk.risk_per_trade must be in (0, 1], got {}",
            self.risk_per_trade
        );
        ensure!(
            self.take_profit >= Decimal::ZERO && self.take_profit < Decimal::ONE,
            "risk.take_profit must be in [0, 1), got {}",
            self.take_profit
        );
        ensure!(
            self.stop_loss >= Decimal::ZERO && self.stop_loss < Decimal::ONE,
            "risk.stop_loss must be in [0, 1), got {}",
            self.stop_loss
        );
        Ok(())
    }
}

/// Longest accepted signal cooldown (one week)
pub const MAX_SIGNAL_COOLDOWN_SECS: u64 = 7 * 24 * 60 * 60;

/// Execution loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sleep after a successful cycle (seconds)
    pub poll_interval_secs: u64,
    /// Sleep after a failed cycle (seconds)
    pub backoff_secs: u64,
    /// Candles fetched per cycle
    pub candle_limit: usize,
    /// Liquidation lookback (seconds)
    pub liquidation_lookback_secs: u64,
    /// Liquidations fetched per cycle
    pub liquidation_limit: usize,
    /// Orientation of liquidation records returned by the gate
    pub liquidation_order: LiquidationOrder,
    /// Same-side order suppression window (seconds, 0 disables)
    pub signal_cooldown_secs: u64,
    /// Longest error message written to the log
    pub max_error_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            backoff_secs: 30,
            candle_limit: 100,
            liquidation_lookback_secs: 4 * 60 * 60,
            liquidation_limit: 50,
            liquidation_order: LiquidationOrder::OldestFirst,
            signal_cooldown_secs: 300,
            max_error_len: 200,
        }
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }

    pub fn liquidation_lookback(&self) -> Duration {
        Duration::from_secs(self.liquidation_lookback_secs)
    }

    /// Cooldown window, clamped to [`MAX_SIGNAL_COOLDOWN_SECS`]
    pub fn signal_cooldown(&self) -> chrono::Duration {
        let secs = self.signal_cooldown_secs.min(MAX_SIGNAL_COOLDOWN_SECS);
        chrono::Duration::seconds(secs as i64)
    }
}

/// Venue endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueConfig {
    /// REST base URL
    pub rest_url: String,
    /// Public WebSocket URL
    pub ws_url: String,
    /// REST request timeout (seconds)
    pub timeout_secs: u64,
    /// Liquidations kept in memory
    pub liquidation_buffer_capacity: usize,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            rest_url: BYBIT_REST_URL.to_string(),
            ws_url: BYBIT_WS_URL.to_string(),
            timeout_secs: 10,
            liquidation_buffer_capacity: 1000,
        }
    }
}

/// Paper execution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Starting paper equity (quote currency)
    pub initial_equity: Decimal,
    /// Fee charged on notional per fill
    pub fee_rate: Decimal,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            initial_equity: dec!(10000),
            fee_rate: dec!(0.00055), // Bybit taker
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Default filter when RUST_LOG is unset
    pub log_level: String,
    /// Log line format
    pub log_format: LogFormat,
    /// Prometheus listener port, disabled when absent
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("loading config {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.instrument.symbol.trim().is_empty(),
            "instrument.symbol must not be empty"
        );
        self.risk.validate()?;
        ensure!(
            self.engine.poll_interval_secs > 0,
            "engine.poll_interval_secs must be positive"
        );
        ensure!(
            self.engine.candle_limit > self.risk.rsi_length,
            "engine.candle_limit ({}) must exceed risk.rsi_length ({})",
            self.engine.candle_limit,
            self.risk.rsi_length
        );
        ensure!(
            self.engine.signal_cooldown_secs <= MAX_SIGNAL_COOLDOWN_SECS,
            "engine.signal_cooldown_secs ({}) must not exceed {}",
            self.engine.signal_cooldown_secs,
            MAX_SIGNAL_COOLDOWN_SECS
        );
        ensure!(
            self.engine.liquidation_limit > 0,
            "engine.liquidation_limit must be positive"
        );
        ensure!(
            self.execution.fee_rate >= Decimal::ZERO,
            "execution.fee_rate must not be negative"
        );
        Ok(())
    }
}
