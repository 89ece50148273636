//! Risk management types

use rust_decimal::Decimal;
use thiserror::Error;

/// Why an order could not be sized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    /// Reference price was zero or negative
    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),
    /// Account equity was zero or negative
    #[error("equity must be positive, got {0}")]
    NonPositiveEquity(Decimal),
    /// Risk budget buys less than one unit
    #[error("risk budget buys less than one unit")]
    ZeroQuantity,
}
