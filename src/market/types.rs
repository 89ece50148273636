//! Market data types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A closed (or forming) kline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Kline start time
    pub open_time: DateTime<Utc>,
    /// Close price
    pub close: Decimal,
    /// Traded volume in base units
    pub volume: Decimal,
}

/// Side of the position that was force-closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidationSide {
    Buy,
    Sell,
}

impl LiquidationSide {
    /// Parse the venue's `"Buy"` / `"Sell"` tag
    pub fn from_venue(tag: &str) -> Option<Self> {
        match tag {
            "Buy" => Some(LiquidationSide::Buy),
            "Sell" => Some(LiquidationSide::Sell),
            _ => None,
        }
    }
}

/// A forced liquidation reported by the venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidationRecord {
    /// Bankruptcy price of the liquidated position
    pub price: Decimal,
    /// Liquidated size in base units
    pub size: Decimal,
    /// Side that was closed
    pub side: LiquidationSide,
    /// Venue event time
    pub timestamp: DateTime<Utc>,
}
