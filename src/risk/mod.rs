//! Risk management module
//!
//! Fixed-fraction position sizing and bracket (take-profit / stop-loss)
//! price levels.

mod sizing;
mod types;

pub use sizing::OrderBuilder;
pub use types::SizingError;
