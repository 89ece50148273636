//! Relative Strength Index

use super::FeatureError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Wilder RSI of the last close in `closes`
///
/// Average gain and loss are seeded with the simple mean of the first
/// `period` changes and then smoothed as `(avg * (period - 1) + x) / period`
/// for every later change. Needs at least `period + 1` closes.
///
/// A window with no losses reads 100; a completely flat window reads 50.
pub fn wilder_rsi(closes: &[Decimal], period: usize) -> Result<Decimal, FeatureError> {
    if period == 0 || closes.len() < period + 1 {
        return Err(FeatureError::InsufficientHistory {
            needed: period + 1,
            available: closes.len(),
        });
    }

    let n = Decimal::from(period);
    let mut changes = closes.windows(2).map(|w| w[1] - w[0]);

    let (mut gain_sum, mut loss_sum) = (Decimal::ZERO, Decimal::ZERO);
    for change in changes.by_ref().take(period) {
        if change > Decimal::ZERO {
            gain_sum += change;
        } else {
            loss_sum -= change;
        }
    }
    let mut avg_gain = gain_sum / n;
    let mut avg_loss = loss_sum / n;

    for change in changes {
        let gain = change.max(Decimal::ZERO);
        let loss = (-change).max(Decimal::ZERO);
        avg_gain = (avg_gain * (n - Decimal::ONE) + gain) / n;
        avg_loss = (avg_loss * (n - Decimal::ONE) + loss) / n;
    }

    if avg_loss.is_zero() {
        return Ok(if avg_gain.is_zero() { dec!(50) } else { dec!(100) });
    }

    let rs = avg_gain / avg_loss;
    Ok(dec!(100) - dec!(100) / (Decimal::ONE + rs))
}
