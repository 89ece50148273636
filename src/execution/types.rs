//! Execution types

use crate::signal::Side;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order identifier
pub type OrderId = Uuid;

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Market order (immediate execution)
    Market,
}

/// A bracketed order ready for submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Trade side
    pub side: Side,
    /// Whole units of the instrument
    pub quantity: Decimal,
    /// Order type
    pub order_type: OrderType,
    /// Last traded price the order was sized against
    pub reference_price: Decimal,
    /// Take-profit trigger price
    pub take_profit_price: Decimal,
    /// Stop-loss trigger price
    pub stop_loss_price: Decimal,
}

/// Venue acknowledgement of an accepted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    /// Venue order id
    pub order_id: OrderId,
    /// Acceptance time
    pub submitted_at: DateTime<Utc>,
}

/// A fill (executed trade)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    /// Order ID
    pub order_id: OrderId,
    /// Trade side
    pub side: Side,
    /// Fill price
    pub price: Decimal,
    /// Fill quantity
    pub quantity: Decimal,
    /// Fill timestamp
    pub timestamp: DateTime<Utc>,
    /// Fees paid
    pub fees: Decimal,
}
