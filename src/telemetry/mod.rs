//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{
    describe_metrics, record_cycle, record_cycle_error, record_latency, record_order, set_gauge,
    GaugeMetric, LatencyMetric,
};

use crate::config::TelemetryConfig;
use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize logging and, when a port is configured, the metrics listener
///
/// Must be called from within a tokio runtime when metrics are enabled.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)?;

    if let Some(port) = config.metrics_port {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .with_context(|| format!("starting metrics listener on {}", addr))?;
        describe_metrics();
        tracing::info!(%addr, "Metrics exporter listening");
    }

    Ok(())
}
