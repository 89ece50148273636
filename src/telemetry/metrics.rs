//! Prometheus metrics
//!
//! Thin wrappers over the `metrics` facade. Without an installed recorder
//! every call is a no-op.

use crate::error::CycleErrorKind;
use crate::signal::Side;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::time::Duration;

const CYCLES_TOTAL: &str = "liqhunter_cycles_total";
const CYCLE_ERRORS_TOTAL: &str = "liqhunter_cycle_errors_total";
const ORDERS_SUBMITTED_TOTAL: &str = "liqhunter_orders_submitted_total";

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// One full decision cycle
    Cycle,
    /// Order submission round trip
    OrderSubmission,
}

impl LatencyMetric {
    fn name(self) -> &'static str {
        match self {
            LatencyMetric::Cycle => "liqhunter_cycle_duration_seconds",
            LatencyMetric::OrderSubmission => "liqhunter_order_submission_seconds",
        }
    }
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Account equity at the last cycle
    Equity,
    /// Last traded price
    LastPrice,
    /// Latest RSI value
    Rsi,
    /// Latest volume ratio
    VolumeRatio,
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::Equity => "liqhunter_equity",
            GaugeMetric::LastPrice => "liqhunter_last_price",
            GaugeMetric::Rsi => "liqhunter_rsi",
            GaugeMetric::VolumeRatio => "liqhunter_volume_ratio",
        }
    }
}

/// Register help text for every metric
pub fn describe_metrics() {
    describe_counter!(CYCLES_TOTAL, "Completed decision cycles by outcome");
    describe_counter!(CYCLE_ERRORS_TOTAL, "Failed decision cycles by error kind");
    describe_counter!(ORDERS_SUBMITTED_TOTAL, "Orders accepted by the venue by side");
    describe_histogram!(
        LatencyMetric::Cycle.name(),
        metrics::Unit::Seconds,
        "Wall time of one decision cycle"
    );
    describe_histogram!(
        LatencyMetric::OrderSubmission.name(),
        metrics::Unit::Seconds,
        "Order submission round trip"
    );
    describe_gauge!(GaugeMetric::Equity.name(), "Account equity");
    describe_gauge!(GaugeMetric::LastPrice.name(), "Last traded price");
    describe_gauge!(GaugeMetric::Rsi.name(), "Latest RSI");
    describe_gauge!(GaugeMetric::VolumeRatio.name(), "Latest volume ratio");
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    histogram!(metric.name()).record(duration.as_secs_f64());
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: Decimal) {
    if let Some(v) = value.to_f64() {
        gauge!(metric.name()).set(v);
    }
}

/// Count a finished cycle
pub fn record_cycle(outcome: &'static str) {
    counter!(CYCLES_TOTAL, "outcome" => outcome).increment(1);
}

/// Count a failed cycle
pub fn record_cycle_error(kind: CycleErrorKind) {
    counter!(CYCLES_TOTAL, "outcome" => "error").increment(1);
    counter!(CYCLE_ERRORS_TOTAL, "kind" => kind.as_str()).increment(1);
}

/// Count an accepted order
pub fn record_order(side: Side) {
    counter!(ORDERS_SUBMITTED_TOTAL, "side" => side.as_str()).increment(1);
}
