//! Feature extraction
//!
//! Turns one cycle's market data into the inputs of the signal evaluator:
//! RSI, volume ratio, and liquidation-derived support/resistance.

mod levels;
mod rsi;
mod volume;

pub use levels::{liquidity_levels, LiquidationOrder, LiquidityLevels, LEVEL_DEPTH};
pub use rsi::wilder_rsi;
pub use volume::{volume_ratio, VOLUME_WINDOW};

use crate::market::{Candle, LiquidationRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a feature could not be computed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    /// Not enough candles for the indicator
    #[error("insufficient history: need {needed} candles, have {available}")]
    InsufficientHistory { needed: usize, available: usize },
    /// A ratio's denominator was empty or zero
    #[error("division undefined: {0}")]
    DivisionUndefined(&'static str),
}

/// Features of a single cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// RSI of the latest close, in [0, 100]
    pub rsi: Decimal,
    /// Latest volume over trailing mean volume
    pub volume_ratio: Decimal,
    /// Liquidation-cluster levels
    pub levels: LiquidityLevels,
    /// Last traded price
    pub current_price: Decimal,
}

/// Computes a [`FeatureSet`] from raw market data
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    /// RSI lookback in candles
    pub rsi_length: usize,
    /// Trailing candles in the volume baseline
    pub volume_window: usize,
    /// Liquidations averaged per side
    pub level_depth: usize,
    /// Orientation of the liquidation sequence
    pub liquidation_order: LiquidationOrder,
}

impl FeatureExtractor {
    /// Create an extractor with the default volume window and level depth
    pub fn new(rsi_length: usize, liquidation_order: LiquidationOrder) -> Self {
        Self {
            rsi_length,
            volume_window: VOLUME_WINDOW,
            level_depth: LEVEL_DEPTH,
            liquidation_order,
        }
    }

    /// Candles needed for a defined RSI
    pub fn min_candles(&self) -> usize {
        self.rsi_length + 1
    }

    /// Extract features from oldest-first candles and liquidations
    pub fn extract(
        &self,
        candles: &[Candle],
        liquidations: &[LiquidationRecord],
        current_price: Decimal,
    ) -> Result<FeatureSet, FeatureError> {
        let closes: Vec<Decimal> = candles.iter().map(|c| c.close).collect();
        let volumes: Vec<Decimal> = candles.iter().map(|c| c.volume).collect();

        let rsi = wilder_rsi(&closes, self.rsi_length)?;
        let volume_ratio = volume_ratio(&volumes, self.volume_window)?;
        let levels = liquidity_levels(liquidations, self.liquidation_order, self.level_depth);

        Ok(FeatureSet {
            rsi,
            volume_ratio,
            levels,
            current_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::LiquidationSide;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    fn candles(closes: &[Decimal], volume: Decimal) -> Vec<Candle> {
        let start = Utc::now() - Duration::minutes(5 * closes.len() as i64);
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Candle {
                open_time: start + Duration::minutes(5 * i as i64),
                close,
                volume,
            })
            .collect()
    }

    #[test]
    fn test_extract_combines_features() {
        let closes: Vec<Decimal> = (0..20).map(|i| dec!(0.0000100) - Decimal::new(i, 8)).collect();
        let data = candles(&closes, dec!(1000));
        let liqs = vec![LiquidationRecord {
            price: dec!(0.0000079),
            size: dec!(1),
            side: LiquidationSide::Buy,
            timestamp: Utc::now(),
        }];

        let extractor = FeatureExtractor::new(14, LiquidationOrder::OldestFirst);
        let features = extractor.extract(&data, &liqs, dec!(0.0000081)).unwrap();

        assert_eq!(features.rsi, dec!(0));
        assert_eq!(features.volume_ratio, dec!(1));
        assert_eq!(features.levels.support, Some(dec!(0.0000079)));
        assert_eq!(features.levels.resistance, None);
        assert_eq!(features.current_price, dec!(0.0000081));
    }

    #[test]
    fn test_extract_short_history_fails() {
        let data = candles(&[dec!(1), dec!(2), dec!(3)], dec!(10));
        let extractor = FeatureExtractor::new(14, LiquidationOrder::OldestFirst);
        assert_eq!(extractor.min_candles(), 15);
        assert!(matches!(
            extractor.extract(&data, &[], dec!(3)),
            Err(FeatureError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn test_extract_zero_volume_fails() {
        let closes: Vec<Decimal> = (1..=20).map(Decimal::from).collect();
        let data = candles(&closes, dec!(0));
        let extractor = FeatureExtractor::new(14, LiquidationOrder::OldestFirst);
        assert!(matches!(
            extractor.extract(&data, &[], dec!(20)),
            Err(FeatureError::DivisionUndefined(_))
        ));
    }
}
