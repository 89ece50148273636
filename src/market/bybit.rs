//! Bybit v5 public market data client
//!
//! Klines and tickers come from the REST API; liquidations come from the
//! [`LiquidationBuffer`] fed by the WebSocket stream.

use super::{Candle, LiquidationBuffer, LiquidationRecord, MarketDataGate};
use crate::error::VenueError;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Bybit REST base URL
pub const BYBIT_REST_URL: &str = "https://api.bybit.com";

/// Bybit public WebSocket URL for linear contracts
pub const BYBIT_WS_URL: &str = "wss://stream.bybit.com/v5/public/linear";

/// Largest kline page the API serves
const MAX_KLINE_LIMIT: usize = 1000;

/// Configuration for the Bybit client
#[derive(Debug, Clone)]
pub struct BybitConfig {
    /// Base URL for the REST API
    pub base_url: String,
    /// Product category (e.g. "linear")
    pub category: String,
    /// Instrument symbol (e.g. "PEPEUSDT")
    pub symbol: String,
    /// Kline interval (e.g. "5" for five minutes)
    pub interval: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for BybitConfig {
    fn default() -> Self {
        Self {
            base_url: BYBIT_REST_URL.to_string(),
            category: "linear".to_string(),
            symbol: "PEPEUSDT".to_string(),
            interval: "5".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Common v5 response envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    ret_code: i64,
    #[serde(default)]
    ret_msg: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// `/v5/market/kline` result
#[derive(Debug, Deserialize)]
struct KlineResult {
    /// Rows of `[start, open, high, low, close, volume, turnover]`, newest first
    list: Vec<Vec<String>>,
}

/// `/v5/market/tickers` result
#[derive(Debug, Deserialize)]
struct TickerResult {
    list: Vec<Ticker>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker {
    #[allow(dead_code)]
    symbol: String,
    last_price: String,
}

/// Client for Bybit's public market endpoints
pub struct BybitClient {
    config: BybitConfig,
    client: Client,
    liquidations: LiquidationBuffer,
}

impl BybitClient {
    /// Create a client reading liquidations from `liquidations`
    pub fn new(config: BybitConfig, liquidations: LiquidationBuffer) -> Result<Self, VenueError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VenueError::Transport(e.to_string()))?;

        Ok(Self {
            config,
            client,
            liquidations,
        })
    }

    /// GET a v5 endpoint and decode its `result`
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, VenueError> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(url = %url, "Bybit request");

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(VenueError::Http { status, body });
        }

        let envelope: ApiResponse = response.json().await?;
        if envelope.ret_code != 0 {
            return Err(VenueError::Rejected {
                code: envelope.ret_code,
                message: envelope.ret_msg,
            });
        }

        serde_json::from_value(envelope.result).map_err(|e| VenueError::Decode(e.to_string()))
    }
}

/// Convert kline rows into candles ordered oldest first
fn parse_klines(rows: Vec<Vec<String>>) -> Result<Vec<Candle>, VenueError> {
    let mut candles = rows
        .into_iter()
        .map(|row| {
            if row.len() < 6 {
                return Err(VenueError::Decode(format!(
                    "kline row has {} fields, expected at least 6",
                    row.len()
                )));
            }
            let start_ms: i64 = row[0]
                .parse()
                .map_err(|_| VenueError::Decode(format!("bad kline start: {}", row[0])))?;
            let open_time = Utc
                .timestamp_millis_opt(start_ms)
                .single()
                .ok_or_else(|| VenueError::Decode(format!("bad kline start: {}", start_ms)))?;

            Ok(Candle {
                open_time,
                close: parse_decimal(&row[4])?,
                volume: parse_decimal(&row[5])?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // The API serves newest first; the newest row is the still-open candle
    candles.sort_by_key(|c| c.open_time);
    Ok(candles)
}

fn parse_decimal(raw: &str) -> Result<Decimal, VenueError> {
    Decimal::from_str(raw).map_err(|_| VenueError::Decode(format!("bad decimal: {}", raw)))
}

#[async_trait]
impl MarketDataGate for BybitClient {
    async fn candles(&self, count: usize) -> Result<Vec<Candle>, VenueError> {
        let limit = count.clamp(1, MAX_KLINE_LIMIT);
        let result: KlineResult = self
            .get(
                "/v5/market/kline",
                &[
                    ("category", self.config.category.clone()),
                    ("symbol", self.config.symbol.clone()),
                    ("interval", self.config.interval.clone()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let candles = parse_klines(result.list)?;
        if candles.is_empty() {
            return Err(VenueError::Empty(format!("no klines for {}", self.config.symbol)));
        }
        Ok(candles)
    }

    async fn last_price(&self) -> Result<Decimal, VenueError> {
        let result: TickerResult = self
            .get(
                "/v5/market/tickers",
                &[
                    ("category", self.config.category.clone()),
                    ("symbol", self.config.symbol.clone()),
                ],
            )
            .await?;

        let ticker = result
            .list
            .into_iter()
            .next()
            .ok_or_else(|| VenueError::Empty(format!("no ticker for {}", self.config.symbol)))?;
        parse_decimal(&ticker.last_price)
    }

    async fn recent_liquidations(
        &self,
        window: Duration,
        max_count: usize,
    ) -> Result<Vec<LiquidationRecord>, VenueError> {
        Ok(self.liquidations.recent(window, max_count, Utc::now()).await)
    }
}
