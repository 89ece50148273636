//! Market data gate
//!
//! Candles, last trade price, and forced-liquidation records for the traded
//! instrument, served from Bybit's public v5 API.

mod bybit;
mod liquidations;
mod types;

pub use bybit::{BybitClient, BybitConfig, BYBIT_REST_URL, BYBIT_WS_URL};
pub use liquidations::{LiquidationBuffer, LiquidationStream};
pub use types::{Candle, LiquidationRecord, LiquidationSide};

use crate::error::VenueError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::time::Duration;

/// Read-only market data contract consumed by the engine
///
/// Every sequence returned by this trait is ordered oldest to newest
/// (latest-last). Implementations that talk to venues returning
/// latest-first data must reverse it before handing it out.
#[async_trait]
pub trait MarketDataGate: Send + Sync {
    /// The most recent `count` candles, oldest first
    async fn candles(&self, count: usize) -> Result<Vec<Candle>, VenueError>;

    /// Price of the most recent trade
    async fn last_price(&self) -> Result<Decimal, VenueError>;

    /// Liquidations within `window` of now, at most `max_count` of the
    /// newest ones, oldest first
    async fn recent_liquidations(
        &self,
        window: Duration,
        max_count: usize,
    ) -> Result<Vec<LiquidationRecord>, VenueError>;
}
