//! Execution loop
//!
//! Drives one decision cycle at a time:
//! 1. Pull candles, liquidations, and the last price from the gate
//! 2. Extract features and evaluate the signal
//! 3. On a long/short signal not held back by the cooldown, size the order
//!    from live equity and submit it
//!
//! A failed cycle is logged and followed by the backoff sleep; nothing the
//! cycle can fail with stops the loop.

mod clock;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use types::{CycleOutcome, EquitySnapshot, LoopState};

use crate::config::{EngineConfig, RiskParameters};
use crate::error::{truncate_message, CycleError, CycleErrorKind};
use crate::execution::ExecutionVenue;
use crate::features::{FeatureExtractor, FeatureSet};
use crate::market::MarketDataGate;
use crate::risk::OrderBuilder;
use crate::signal::{evaluate, CooldownCheck, Signal, SignalCooldown};
use crate::telemetry::{
    record_cycle, record_cycle_error, record_latency, record_order, set_gauge, GaugeMetric,
    LatencyMetric,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Instant;

/// Single-instrument trading engine
pub struct Engine<D: MarketDataGate, X: ExecutionVenue, C: Clock> {
    gate: D,
    venue: X,
    clock: C,
    params: RiskParameters,
    settings: EngineConfig,
    extractor: FeatureExtractor,
    orders: OrderBuilder,
    cooldown: SignalCooldown,
    baseline: EquitySnapshot,
    state: LoopState,
    cycles: u64,
}

impl<D: MarketDataGate, X: ExecutionVenue, C: Clock> Engine<D, X, C> {
    /// Create an engine; `baseline` is only used to report equity drift
    pub fn new(
        gate: D,
        venue: X,
        clock: C,
        params: RiskParameters,
        settings: EngineConfig,
        baseline: EquitySnapshot,
    ) -> Self {
        Self {
            extractor: FeatureExtractor::new(params.rsi_length, settings.liquidation_order),
            orders: OrderBuilder::from_params(&params),
            cooldown: SignalCooldown::new(settings.signal_cooldown()),
            gate,
            venue,
            clock,
            params,
            settings,
            baseline,
            state: LoopState::Polling,
            cycles: 0,
        }
    }

    pub fn venue(&self) -> &X {
        &self.venue
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn params(&self) -> &RiskParameters {
        &self.params
    }

    pub fn baseline(&self) -> &EquitySnapshot {
        &self.baseline
    }

    /// State after the most recent cycle
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Cycles run so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Fetch market data and evaluate the signal without trading
    pub async fn evaluate_once(&self) -> Result<(FeatureSet, Signal), CycleError> {
        let candles = self
            .gate
            .candles(self.settings.candle_limit)
            .await
            .map_err(CycleError::data)?;
        if candles.is_empty() {
            return Err(CycleError::DataUnavailable("no candles returned".to_string()));
        }

        let liquidations = self
            .gate
            .recent_liquidations(
                self.settings.liquidation_lookback(),
                self.settings.liquidation_limit,
            )
            .await
            .map_err(CycleError::data)?;

        let price = self.gate.last_price().await.map_err(CycleError::data)?;

        let features = self.extractor.extract(&candles, &liquidations, price)?;
        let signal = evaluate(&features, &self.params);

        Ok((features, signal))
    }

    /// One cycle without the trailing sleep
    ///
    /// Order submission is the last side effect; the cooldown is armed only
    /// once the venue has accepted the order.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, CycleError> {
        let (features, signal) = self.evaluate_once().await?;
        set_gauge(GaugeMetric::Rsi, features.rsi);
        set_gauge(GaugeMetric::VolumeRatio, features.volume_ratio);
        set_gauge(GaugeMetric::LastPrice, features.current_price);

        let Some(side) = signal.side() else {
            return Ok(CycleOutcome::Waiting { features, signal });
        };

        if let CooldownCheck::Suppressed { remaining } = self.cooldown.check(side, self.clock.now())
        {
            return Ok(CycleOutcome::Suppressed {
                features,
                signal,
                remaining,
            });
        }

        let equity = self.venue.equity().await.map_err(CycleError::data)?;
        set_gauge(GaugeMetric::Equity, equity);

        let order = self.orders.build(side, features.current_price, equity)?;

        let started = Instant::now();
        let ack = self
            .venue
            .submit_order(&order)
            .await
            .map_err(CycleError::submission)?;
        record_latency(LatencyMetric::OrderSubmission, started.elapsed());
        record_order(side);

        self.cooldown.record(side, self.clock.now());

        Ok(CycleOutcome::Fired {
            features,
            signal,
            order,
            ack,
            equity,
        })
    }

    /// Run one cycle, report it, then sleep the poll or backoff interval
    pub async fn step(&mut self) -> LoopState {
        self.cycles += 1;
        let started = Instant::now();

        let next = match self.run_cycle().await {
            Ok(outcome) => {
                self.report(&outcome);
                record_cycle(outcome.label());
                LoopState::Polling
            }
            Err(err) => {
                self.report_error(&err);
                record_cycle_error(err.kind());
                LoopState::Backoff
            }
        };
        record_latency(LatencyMetric::Cycle, started.elapsed());

        self.state = next;
        let delay = match next {
            LoopState::Polling => self.settings.poll_interval(),
            LoopState::Backoff => self.settings.backoff(),
        };
        self.clock.sleep(delay).await;

        next
    }

    /// Step forever
    pub async fn run(&mut self) {
        tracing::info!(
            baseline_equity = %self.baseline.equity,
            poll_interval_secs = self.settings.poll_interval_secs,
            backoff_secs = self.settings.backoff_secs,
            "Engine started"
        );
        loop {
            self.step().await;
        }
    }

    /// Step `cycles` times
    pub async fn run_for(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.step().await;
        }
        tracing::info!(cycles = self.cycles, "Engine finished bounded run");
    }

    fn report(&self, outcome: &CycleOutcome) {
        let cycle = self.cycles;
        let features = outcome.features();

        match outcome {
            CycleOutcome::Waiting { .. } => {
                tracing::info!(
                    cycle,
                    outcome = outcome.label(),
                    rsi = %features.rsi,
                    volume_ratio = %features.volume_ratio,
                    support = ?features.levels.support,
                    resistance = ?features.levels.resistance,
                    price = %features.current_price,
                    "No setup"
                );
            }
            CycleOutcome::Suppressed {
                signal, remaining, ..
            } => {
                tracing::info!(
                    cycle,
                    outcome = outcome.label(),
                    side = ?outcome.side(),
                    remaining_secs = remaining.num_seconds(),
                    rationale = %signal.rationale,
                    "Setup repeated within cooldown, not submitting"
                );
            }
            CycleOutcome::Fired {
                signal,
                order,
                ack,
                equity,
                ..
            } => {
                tracing::info!(
                    cycle,
                    outcome = outcome.label(),
                    order_id = %ack.order_id,
                    side = %order.side,
                    quantity = %order.quantity,
                    price = %order.reference_price,
                    take_profit = %order.take_profit_price,
                    take_profit_pct = %(self.params.take_profit * dec!(100)).normalize(),
                    stop_loss = %order.stop_loss_price,
                    stop_loss_pct = %(self.params.stop_loss * dec!(100)).normalize(),
                    confidence = %signal.confidence,
                    rationale = %signal.rationale,
                    "Order submitted"
                );
                self.report_drift(*equity);
            }
        }
    }

    fn report_drift(&self, equity: Decimal) {
        let drift = equity - self.baseline.equity;
        tracing::info!(
            equity = %equity,
            baseline = %self.baseline.equity,
            drift = %drift,
            since = %self.baseline.captured_at,
            "Equity drift since start"
        );
    }

    fn report_error(&self, err: &CycleError) {
        let cycle = self.cycles;
        let kind = err.kind();
        let message = truncate_message(&err.to_string(), self.settings.max_error_len);
        let backoff_secs = self.settings.backoff_secs;

        match kind {
            CycleErrorKind::DataUnavailable => tracing::warn!(
                cycle,
                outcome = "error",
                kind = kind.as_str(),
                error = %message,
                backoff_secs,
                "Market data unavailable"
            ),
            CycleErrorKind::ComputationUndefined => tracing::warn!(
                cycle,
                outcome = "error",
                kind = kind.as_str(),
                error = %message,
                backoff_secs,
                "Features undefined for this window"
            ),
            CycleErrorKind::InvalidSize => tracing::warn!(
                cycle,
                outcome = "error",
                kind = kind.as_str(),
                error = %message,
                backoff_secs,
                "Order size invalid, skipping trade"
            ),
            CycleErrorKind::SubmissionFailure => tracing::error!(
                cycle,
                outcome = "error",
                kind = kind.as_str(),
                error = %message,
                backoff_secs,
                "Order submission failed"
            ),
        }
    }
}
