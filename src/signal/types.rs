//! Signal types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade side of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy, profit when price rises
    Long,
    /// Sell, profit when price falls
    Short,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "long",
            Side::Short => "short",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction decided by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
    /// No trade this cycle
    None,
}

/// Output of one evaluation
///
/// Carries no id or timestamp so that equal inputs give equal signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Decided direction
    pub direction: Direction,
    /// Confidence in [0, 1]
    pub confidence: Decimal,
    /// Human-readable reason
    pub rationale: String,
}

impl Signal {
    /// The no-trade signal
    pub fn waiting() -> Self {
        Self {
            direction: Direction::None,
            confidence: Decimal::ZERO,
            rationale: "waiting".to_string(),
        }
    }

    /// Trade side, if the signal calls for a trade
    pub fn side(&self) -> Option<Side> {
        match self.direction {
            Direction::Long => Some(Side::Long),
            Direction::Short => Some(Side::Short),
            Direction::None => None,
        }
    }
}
