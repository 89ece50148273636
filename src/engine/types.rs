//! Engine state and cycle results

use crate::execution::{OrderAck, OrderRequest};
use crate::features::FeatureSet;
use crate::signal::{Side, Signal};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Scheduler state after a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Last cycle succeeded; next sleep is the poll interval
    Polling,
    /// Last cycle failed; next sleep is the backoff interval
    Backoff,
}

/// Account equity at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquitySnapshot {
    pub equity: Decimal,
    pub captured_at: DateTime<Utc>,
}

impl EquitySnapshot {
    pub fn new(equity: Decimal, captured_at: DateTime<Utc>) -> Self {
        Self {
            equity,
            captured_at,
        }
    }
}

/// Result of a cycle that completed without error
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// No setup this cycle
    Waiting { features: FeatureSet, signal: Signal },
    /// Setup found but the same side fired too recently
    Suppressed {
        features: FeatureSet,
        signal: Signal,
        remaining: chrono::Duration,
    },
    /// Order accepted by the venue
    Fired {
        features: FeatureSet,
        signal: Signal,
        order: OrderRequest,
        ack: OrderAck,
        /// Live equity the order was sized from
        equity: Decimal,
    },
}

impl CycleOutcome {
    /// Log field and metric label
    pub fn label(&self) -> &'static str {
        match self {
            CycleOutcome::Waiting { .. } => "waiting",
            CycleOutcome::Suppressed { .. } => "suppressed",
            CycleOutcome::Fired { .. } => "fired",
        }
    }

    pub fn features(&self) -> &FeatureSet {
        match self {
            CycleOutcome::Waiting { features, .. }
            | CycleOutcome::Suppressed { features, .. }
            | CycleOutcome::Fired { features, .. } => features,
        }
    }

    pub fn signal(&self) -> &Signal {
        match self {
            CycleOutcome::Waiting { signal, .. }
            | CycleOutcome::Suppressed { signal, .. }
            | CycleOutcome::Fired { signal, .. } => signal,
        }
    }

    /// Side of the setup, if the cycle found one
    pub fn side(&self) -> Option<Side> {
        self.signal().side()
    }
}
