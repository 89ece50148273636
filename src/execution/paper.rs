//! Paper trading execution venue

use super::{ExecutionVenue, Fill, OrderAck, OrderId, OrderRequest};
use crate::error::VenueError;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Paper venue with immediate fills at the reference price
///
/// Equity starts at the configured balance and is reduced only by fees;
/// brackets are recorded but never triggered.
pub struct PaperVenue {
    fee_rate: Decimal,
    equity: Arc<RwLock<Decimal>>,
    fills: Arc<RwLock<Vec<Fill>>>,
}

impl PaperVenue {
    /// Create a new paper venue
    pub fn new(initial_equity: Decimal, fee_rate: Decimal) -> Self {
        Self {
            fee_rate,
            equity: Arc::new(RwLock::new(initial_equity)),
            fills: Arc::new(RwLock::new(vec![])),
        }
    }

    /// All simulated fills so far
    pub async fn fills(&self) -> Vec<Fill> {
        self.fills.read().await.clone()
    }
}

#[async_trait]
impl ExecutionVenue for PaperVenue {
    async fn equity(&self) -> Result<Decimal, VenueError> {
        Ok(*self.equity.read().await)
    }

    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, VenueError> {
        if order.quantity <= Decimal::ZERO {
            return Err(VenueError::Rejected {
                code: 10001,
                message: format!("quantity must be positive, got {}", order.quantity),
            });
        }

        let order_id = OrderId::new_v4();
        let timestamp = Utc::now();
        let fees = order.quantity * order.reference_price * self.fee_rate;

        {
            let mut equity = self.equity.write().await;
            *equity -= fees;
        }

        self.fills.write().await.push(Fill {
            order_id,
            side: order.side,
            price: order.reference_price,
            quantity: order.quantity,
            timestamp,
            fees,
        });

        tracing::info!(
            ?order_id,
            side = %order.side,
            quantity = %order.quantity,
            price = %order.reference_price,
            take_profit = %order.take_profit_price,
            stop_loss = %order.stop_loss_price,
            "Paper order filled"
        );

        Ok(OrderAck {
            order_id,
            submitted_at: timestamp,
        })
    }
}
