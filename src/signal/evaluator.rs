//! Signal evaluation
//!
//! Oversold RSI with a volume surge near clustered long liquidations reads
//! as a bounce off support; the mirror image near short liquidations reads
//! as a rejection at resistance.

use super::{Direction, Signal};
use crate::config::RiskParameters;
use crate::features::FeatureSet;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Price may sit up to 1.5% above support for a long
pub const SUPPORT_PROXIMITY: Decimal = dec!(1.015);

/// Price may sit up to 1.5% below resistance for a short
pub const RESISTANCE_PROXIMITY: Decimal = dec!(0.985);

/// Shorts need only 80% of the long volume threshold
pub const SHORT_VOLUME_DISCOUNT: Decimal = dec!(0.8);

pub const LONG_CONFIDENCE: Decimal = dec!(0.99);
pub const SHORT_CONFIDENCE: Decimal = dec!(0.95);

/// Decide the trade for one cycle
///
/// Pure and deterministic. Long is checked first; with
/// `rsi_oversold < rsi_overbought` the two cases cannot both hold.
pub fn evaluate(features: &FeatureSet, params: &RiskParameters) -> Signal {
    if let Some(support) = long_setup(features, params) {
        return Signal {
            direction: Direction::Long,
            confidence: LONG_CONFIDENCE,
            rationale: format!("LIQ PUMP: support {}", support),
        };
    }

    if let Some(resistance) = short_setup(features, params) {
        return Signal {
            direction: Direction::Short,
            confidence: SHORT_CONFIDENCE,
            rationale: format!("LIQ DUMP: resistance {}", resistance),
        };
    }

    Signal::waiting()
}

/// Support level when every long condition holds
fn long_setup(features: &FeatureSet, params: &RiskParameters) -> Option<Decimal> {
    let support = features.levels.support?;
    let triggered = features.rsi < params.rsi_oversold
        && features.volume_ratio > params.vol_threshold
        && features.current_price <= support * SUPPORT_PROXIMITY;
    triggered.then_some(support)
}

/// Resistance level when every short condition holds
fn short_setup(features: &FeatureSet, params: &RiskParameters) -> Option<Decimal> {
    let resistance = features.levels.resistance?;
    let triggered = features.rsi > params.rsi_overbought
        && features.volume_ratio > params.vol_threshold * SHORT_VOLUME_DISCOUNT
        && features.current_price >= resistance * RESISTANCE_PROXIMITY;
    triggered.then_some(resistance)
}
