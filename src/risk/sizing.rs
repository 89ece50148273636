//! Position sizing and bracket levels
//!
//! Size is a fixed fraction of live equity converted to whole units at the
//! current price. Brackets are symmetric percentage offsets from that price.

use super::SizingError;
use crate::config::RiskParameters;
use crate::execution::{OrderRequest, OrderType};
use crate::signal::Side;
use rust_decimal::Decimal;

/// Builds bracketed market orders from risk parameters
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    /// Fraction of equity committed per trade, in (0, 1]
    pub risk_per_trade: Decimal,
    /// Take-profit distance as a fraction of price
    pub take_profit: Decimal,
    /// Stop-loss distance as a fraction of price
    pub stop_loss: Decimal,
}

impl OrderBuilder {
    /// Create from the configured risk parameters
    pub fn from_params(params: &RiskParameters) -> Self {
        Self {
            risk_per_trade: params.risk_per_trade,
            take_profit: params.take_profit,
            stop_loss: params.stop_loss,
        }
    }

    /// Whole units affordable with `equity * risk_per_trade` at `price`
    pub fn quantity(&self, equity: Decimal, price: Decimal) -> Result<Decimal, SizingError> {
        if price <= Decimal::ZERO {
            return Err(SizingError::NonPositivePrice(price));
        }
        if equity <= Decimal::ZERO {
            return Err(SizingError::NonPositiveEquity(equity));
        }

        let quantity = (equity * self.risk_per_trade / price).floor();
        if quantity <= Decimal::ZERO {
            return Err(SizingError::ZeroQuantity);
        }
        Ok(quantity.normalize())
    }

    /// Take-profit price for `side` entered at `price`
    pub fn take_profit_price(&self, side: Side, price: Decimal) -> Decimal {
        let offset = match side {
            Side::Long => Decimal::ONE + self.take_profit,
            Side::Short => Decimal::ONE - self.take_profit,
        };
        (price * offset).normalize()
    }

    /// Stop-loss price for `side` entered at `price`
    pub fn stop_loss_price(&self, side: Side, price: Decimal) -> Decimal {
        let offset = match side {
            Side::Long => Decimal::ONE - self.stop_loss,
            Side::Short => Decimal::ONE + self.stop_loss,
        };
        (price * offset).normalize()
    }

    /// Market order on `side` sized from `equity` at `price`
    pub fn build(
        &self,
        side: Side,
        price: Decimal,
        equity: Decimal,
    ) -> Result<OrderRequest, SizingError> {
        let quantity = self.quantity(equity, price)?;

        Ok(OrderRequest {
            side,
            quantity,
            order_type: OrderType::Market,
            reference_price: price,
            take_profit_price: self.take_profit_price(side, price),
            stop_loss_price: self.stop_loss_price(side, price),
        })
    }
}
