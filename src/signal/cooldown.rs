//! Duplicate-signal suppression
//!
//! The evaluator has no memory, so a setup that persists across cycles
//! fires every poll. The cooldown keeps a persisting setup from stacking a
//! new live order each time.

use super::Side;
use chrono::{DateTime, Duration, Utc};

/// Outcome of a cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownCheck {
    /// Order may be submitted
    Clear,
    /// Same side was submitted too recently
    Suppressed {
        /// Time left until the side is clear again
        remaining: Duration,
    },
}

/// Remembers the last submitted side and when it was submitted
#[derive(Debug, Clone)]
pub struct SignalCooldown {
    period: Duration,
    last: Option<(Side, DateTime<Utc>)>,
}

impl SignalCooldown {
    /// Create a cooldown; a zero period never suppresses
    pub fn new(period: Duration) -> Self {
        Self { period, last: None }
    }

    /// Whether an order on `side` may be submitted at `now`
    ///
    /// Only the side of the last submission is ever suppressed.
    pub fn check(&self, side: Side, now: DateTime<Utc>) -> CooldownCheck {
        match self.last {
            Some((last_side, at)) if last_side == side => {
                let elapsed = now - at;
                if elapsed < self.period {
                    CooldownCheck::Suppressed {
                        remaining: self.period - elapsed,
                    }
                } else {
                    CooldownCheck::Clear
                }
            }
            _ => CooldownCheck::Clear,
        }
    }

    /// Arm the cooldown after a successful submission
    pub fn record(&mut self, side: Side, at: DateTime<Utc>) {
        self.last = Some((side, at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_cooldown_is_clear() {
        let cooldown = SignalCooldown::new(Duration::minutes(5));
        assert_eq!(cooldown.check(Side::Long, Utc::now()), CooldownCheck::Clear);
        assert_eq!(cooldown.check(Side::Short, Utc::now()), CooldownCheck::Clear);
    }

    #[test]
    fn test_same_side_suppressed_within_period() {
        let mut cooldown = SignalCooldown::new(Duration::minutes(5));
        let t0 = Utc::now();
        cooldown.record(Side::Long, t0);

        let check = cooldown.check(Side::Long, t0 + Duration::seconds(10));
        assert_eq!(
            check,
            CooldownCheck::Suppressed {
                remaining: Duration::seconds(290)
            }
        );
    }

    #[test]
    fn test_same_side_clear_after_period() {
        let mut cooldown = SignalCooldown::new(Duration::minutes(5));
        let t0 = Utc::now();
        cooldown.record(Side::Long, t0);

        assert_eq!(
            cooldown.check(Side::Long, t0 + Duration::minutes(5)),
            CooldownCheck::Clear
        );
    }

    #[test]
    fn test_opposite_side_never_suppressed() {
        let mut cooldown = SignalCooldown::new(Duration::minutes(5));
        let t0 = Utc::now();
        cooldown.record(Side::Long, t0);

        assert_eq!(
            cooldown.check(Side::Short, t0 + Duration::seconds(1)),
            CooldownCheck::Clear
        );
    }

    #[test]
    fn test_zero_period_disables_suppression() {
        let mut cooldown = SignalCooldown::new(Duration::zero());
        let t0 = Utc::now();
        cooldown.record(Side::Short, t0);

        assert_eq!(cooldown.check(Side::Short, t0), CooldownCheck::Clear);
    }
}
