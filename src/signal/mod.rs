//! Signal generation module
//!
//! Turns a cycle's features into a long/short/no-trade decision and
//! throttles repeated decisions.

mod cooldown;
mod evaluator;
mod types;

pub use cooldown::{CooldownCheck, SignalCooldown};
pub use evaluator::{
    evaluate, LONG_CONFIDENCE, RESISTANCE_PROXIMITY, SHORT_CONFIDENCE, SHORT_VOLUME_DISCOUNT,
    SUPPORT_PROXIMITY,
};
pub use types::{Direction, Side, Signal};
