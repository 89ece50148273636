//! Liquidation-cluster support and resistance

use crate::market::{LiquidationRecord, LiquidationSide};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Records averaged per side
pub const LEVEL_DEPTH: usize = 3;

/// Orientation of a liquidation sequence as handed to the extractor
///
/// "Most recent" is positional: the extractor never sorts by timestamp or
/// price, it trusts the order the data source returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidationOrder {
    /// Latest record last (the `MarketDataGate` contract)
    #[default]
    OldestFirst,
    /// Latest record first
    NewestFirst,
}

/// Support and resistance derived from recent liquidations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiquidityLevels {
    /// Mean of the most recent BUY-side liquidation prices
    pub support: Option<Decimal>,
    /// Mean of the most recent SELL-side liquidation prices
    pub resistance: Option<Decimal>,
}

/// Compute levels from `records` laid out in `order`
pub fn liquidity_levels(
    records: &[LiquidationRecord],
    order: LiquidationOrder,
    depth: usize,
) -> LiquidityLevels {
    LiquidityLevels {
        support: side_level(records, LiquidationSide::Buy, order, depth),
        resistance: side_level(records, LiquidationSide::Sell, order, depth),
    }
}

/// Mean price of the `depth` most recent records on `side`
fn side_level(
    records: &[LiquidationRecord],
    side: LiquidationSide,
    order: LiquidationOrder,
    depth: usize,
) -> Option<Decimal> {
    let prices: Vec<Decimal> = records
        .iter()
        .filter(|r| r.side == side)
        .map(|r| r.price)
        .collect();

    let recent = match order {
        LiquidationOrder::OldestFirst => &prices[prices.len().saturating_sub(depth)..],
        LiquidationOrder::NewestFirst => &prices[..prices.len().min(depth)],
    };

    if recent.is_empty() {
        return None;
    }

    let sum: Decimal = recent.iter().copied().sum();
    Some((sum / Decimal::from(recent.len())).normalize())
}
