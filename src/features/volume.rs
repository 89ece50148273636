//! Short-window volume ratio

use super::FeatureError;
use rust_decimal::Decimal;

/// Candles averaged for the volume baseline
///
/// The newest kline Bybit serves is the candle still forming, so early in
/// each interval the latest volume is partial and the ratio reads low.
pub const VOLUME_WINDOW: usize = 10;

/// Latest volume divided by the mean of the trailing `window` volumes
///
/// The trailing window includes the latest candle. With fewer than `window`
/// volumes the whole slice is used. Computed as `latest * len / sum`, so
/// scaling every volume by the same positive factor leaves it unchanged.
pub fn volume_ratio(volumes: &[Decimal], window: usize) -> Result<Decimal, FeatureError> {
    let start = volumes.len().saturating_sub(window);
    let trailing = &volumes[start..];

    let Some(&latest) = trailing.last() else {
        return Err(FeatureError::DivisionUndefined("empty volume window"));
    };

    let sum: Decimal = trailing.iter().copied().sum();
    if sum.is_zero() {
        return Err(FeatureError::DivisionUndefined("zero mean volume"));
    }

    Ok(latest * Decimal::from(trailing.len()) / sum)
}
