//! Bybit `allLiquidation` stream and its in-memory buffer
//!
//! Bybit publishes forced liquidations only as a WebSocket topic, so the
//! gate keeps a rolling buffer fed by a background task and answers
//! `recent_liquidations` from it.

use super::{LiquidationRecord, LiquidationSide};
use crate::ws::{WsClient, WsConfig, WsMessage};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

/// Application-level heartbeat Bybit expects on public streams
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);

/// Rolling, arrival-ordered store of liquidation records
///
/// Records are kept in the order they arrived (oldest at the front).
/// Entries older than `retention` relative to the newest push are pruned and
/// the total is capped at `capacity`.
#[derive(Debug, Clone)]
pub struct LiquidationBuffer {
    records: Arc<RwLock<VecDeque<LiquidationRecord>>>,
    retention: chrono::Duration,
    capacity: usize,
}

impl LiquidationBuffer {
    /// Create an empty buffer
    pub fn new(retention: Duration, capacity: usize) -> Self {
        Self {
            records: Arc::new(RwLock::new(VecDeque::new())),
            retention: chrono::Duration::from_std(retention)
                .unwrap_or_else(|_| chrono::Duration::hours(4)),
            capacity: capacity.max(1),
        }
    }

    /// Append a record in arrival order
    pub async fn push(&self, record: LiquidationRecord) {
        let cutoff = record.timestamp - self.retention;
        let mut records = self.records.write().await;
        records.push_back(record);

        while let Some(front) = records.front() {
            if front.timestamp < cutoff || records.len() > self.capacity {
                records.pop_front();
            } else {
                break;
            }
        }
    }

    /// Newest `max_count` records no older than `window` before `now`,
    /// oldest first
    pub async fn recent(
        &self,
        window: Duration,
        max_count: usize,
        now: DateTime<Utc>,
    ) -> Vec<LiquidationRecord> {
        let window = chrono::Duration::from_std(window).unwrap_or(self.retention);
        let cutoff = now - window;
        let records = self.records.read().await;

        let in_window: Vec<&LiquidationRecord> =
            records.iter().filter(|r| r.timestamp >= cutoff).collect();
        let skip = in_window.len().saturating_sub(max_count);

        in_window.into_iter().skip(skip).cloned().collect()
    }

    /// Number of buffered records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

/// Envelope of a Bybit public stream message
#[derive(Debug, Deserialize)]
struct StreamMessage {
    /// Topic name, absent on op responses (subscribe/pong)
    topic: Option<String>,
    /// Topic payload
    #[serde(default)]
    data: Vec<LiquidationEntry>,
}

/// A single entry of the `allLiquidation` topic
#[derive(Debug, Deserialize)]
struct LiquidationEntry {
    /// Event time (milliseconds)
    #[serde(rename = "T")]
    time: i64,
    /// Symbol
    #[serde(rename = "s")]
    symbol: String,
    /// Liquidated position side
    #[serde(rename = "S")]
    side: String,
    /// Executed size
    #[serde(rename = "v")]
    size: String,
    /// Bankruptcy price
    #[serde(rename = "p")]
    price: String,
}

/// Subscribes to `allLiquidation.<symbol>` and feeds a [`LiquidationBuffer`]
pub struct LiquidationStream {
    url: String,
    symbol: String,
    buffer: LiquidationBuffer,
}

impl LiquidationStream {
    /// Create a stream for `symbol` writing into `buffer`
    pub fn new(url: impl Into<String>, symbol: impl Into<String>, buffer: LiquidationBuffer) -> Self {
        Self {
            url: url.into(),
            symbol: symbol.into().to_uppercase(),
            buffer,
        }
    }

    /// Topic name for the configured symbol
    fn topic(&self) -> String {
        format!("allLiquidation.{}", self.symbol)
    }

    /// Subscription request sent after every (re)connect
    fn subscribe_message(&self) -> String {
        serde_json::json!({ "op": "subscribe", "args": [self.topic()] }).to_string()
    }

    /// Parse a stream message into records for `symbol`
    ///
    /// Op responses, other topics, and malformed entries yield nothing.
    fn parse_message(msg: &str, symbol: &str) -> Vec<LiquidationRecord> {
        let Ok(message) = serde_json::from_str::<StreamMessage>(msg) else {
            return Vec::new();
        };

        match message.topic {
            Some(topic) if topic.starts_with("allLiquidation.") => {}
            _ => return Vec::new(),
        }

        message
            .data
            .into_iter()
            .filter(|entry| entry.symbol == symbol)
            .filter_map(|entry| {
                Some(LiquidationRecord {
                    price: Decimal::from_str(&entry.price).ok()?,
                    size: Decimal::from_str(&entry.size).ok()?,
                    side: LiquidationSide::from_venue(&entry.side)?,
                    timestamp: Utc.timestamp_millis_opt(entry.time).single()?,
                })
            })
            .collect()
    }

    /// Run the message processing loop until the socket task gives up
    async fn run_message_loop(
        mut ws_rx: mpsc::Receiver<WsMessage>,
        send_tx: mpsc::Sender<String>,
        subscribe: String,
        symbol: String,
        buffer: LiquidationBuffer,
    ) {
        let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
        heartbeat.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let ping = serde_json::json!({ "op": "ping" }).to_string();

        loop {
            tokio::select! {
                msg = ws_rx.recv() => {
                    let Some(msg) = msg else { break };
                    match msg {
                        WsMessage::Text(text) => {
                            for record in Self::parse_message(&text, &symbol) {
                                tracing::debug!(
                                    side = ?record.side,
                                    price = %record.price,
                                    size = %record.size,
                                    "Liquidation received"
                                );
                                buffer.push(record).await;
                            }
                        }
                        WsMessage::Connected => {
                            tracing::info!(symbol = %symbol, "Liquidation stream connected");
                            if send_tx.send(subscribe.clone()).await.is_err() {
                                break;
                            }
                        }
                        WsMessage::Disconnected => {
                            tracing::error!(symbol = %symbol, "Liquidation stream disconnected");
                            break;
                        }
                        WsMessage::Reconnecting { attempt } => {
                            tracing::warn!(attempt, "Liquidation stream reconnecting...");
                        }
                        WsMessage::Binary(_) => {}
                    }
                }
                _ = heartbeat.tick() => {
                    let buffered = buffer.len().await;
                    tracing::debug!(buffered, "Liquidation stream heartbeat");
                    if send_tx.send(ping.clone()).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    /// Connect and start feeding the buffer in a background task
    pub fn spawn(&self) -> JoinHandle<()> {
        tracing::info!(url = %self.url, topic = %self.topic(), "Subscribing to liquidation stream");

        let config = WsConfig::new(self.url.clone())
            .max_reconnects(0)
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(60))
            .ping_interval(HEARTBEAT_INTERVAL);
        let (ws_rx, send_tx) = WsClient::new(config).connect();

        let subscribe = self.subscribe_message();
        let symbol = self.symbol.clone();
        let buffer = self.buffer.clone();

        tokio::spawn(async move {
            Self::run_message_loop(ws_rx, send_tx, subscribe, symbol, buffer).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(price: Decimal, side: LiquidationSide, ts: DateTime<Utc>) -> LiquidationRecord {
        LiquidationRecord {
            price,
            size: dec!(1000),
            side,
            timestamp: ts,
        }
    }

    #[test]
    fn test_subscribe_message() {
        let buffer = LiquidationBuffer::new(Duration::from_secs(3600), 10);
        let stream = LiquidationStream::new("wss://example.com", "pepeusdt", buffer);
        assert_eq!(stream.topic(), "allLiquidation.PEPEUSDT");
        assert_eq!(
            stream.subscribe_message(),
            r#"{"args":["allLiquidation.PEPEUSDT"],"op":"subscribe"}"#
        );
    }

    #[test]
    fn test_parse_liquidation_message() {
        let msg = r#"{
            "topic": "allLiquidation.PEPEUSDT",
            "type": "snapshot",
            "ts": 1739502303204,
            "data": [
                {"T": 1739502302929, "s": "PEPEUSDT", "S": "Sell", "v": "20000000", "p": "0.0000081"},
                {"T": 1739502302950, "s": "PEPEUSDT", "S": "Buy", "v": "5000000", "p": "0.0000079"}
            ]
        }"#;

        let records = LiquidationStream::parse_message(msg, "PEPEUSDT");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].side, LiquidationSide::Sell);
        assert_eq!(records[0].price, dec!(0.0000081));
        assert_eq!(records[1].side, LiquidationSide::Buy);
        assert_eq!(records[1].size, dec!(5000000));
    }

    #[test]
    fn test_parse_ignores_op_responses_and_bad_entries() {
        let pong = r#"{"success":true,"ret_msg":"pong","conn_id":"abc","op":"ping"}"#;
        assert!(LiquidationStream::parse_message(pong, "PEPEUSDT").is_empty());

        let other_symbol = r#"{"topic":"allLiquidation.BTCUSDT","data":[
            {"T":1739502302929,"s":"BTCUSDT","S":"Buy","v":"1","p":"95000"}]}"#;
        assert!(LiquidationStream::parse_message(other_symbol, "PEPEUSDT").is_empty());

        let bad_price = r#"{"topic":"allLiquidation.PEPEUSDT","data":[
            {"T":1739502302929,"s":"PEPEUSDT","S":"Buy","v":"1","p":"n/a"}]}"#;
        assert!(LiquidationStream::parse_message(bad_price, "PEPEUSDT").is_empty());

        assert!(LiquidationStream::parse_message("not json", "PEPEUSDT").is_empty());
    }

    #[tokio::test]
    async fn test_buffer_keeps_arrival_order_and_caps() {
        let buffer = LiquidationBuffer::new(Duration::from_secs(4 * 3600), 3);
        let now = Utc::now();

        for i in 0..5 {
            let ts = now - chrono::Duration::minutes(10 - i);
            buffer
                .push(record(Decimal::from(i), LiquidationSide::Buy, ts))
                .await;
        }

        assert_eq!(buffer.len().await, 3);
        let recent = buffer.recent(Duration::from_secs(3600), 50, now).await;
        let prices: Vec<Decimal> = recent.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![dec!(2), dec!(3), dec!(4)]);
    }

    #[tokio::test]
    async fn test_buffer_recent_applies_window_and_count() {
        let buffer = LiquidationBuffer::new(Duration::from_secs(24 * 3600), 100);
        let now = Utc::now();

        buffer
            .push(record(dec!(1), LiquidationSide::Sell, now - chrono::Duration::hours(5)))
            .await;
        for i in 0..4 {
            let ts = now - chrono::Duration::minutes(30 - i);
            buffer
                .push(record(Decimal::from(10 + i), LiquidationSide::Sell, ts))
                .await;
        }

        let recent = buffer.recent(Duration::from_secs(4 * 3600), 2, now).await;
        let prices: Vec<Decimal> = recent.iter().map(|r| r.price).collect();
        assert_eq!(prices, vec![dec!(12), dec!(13)]);

        let all = buffer.recent(Duration::from_secs(4 * 3600), 50, now).await;
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_buffer_prunes_expired_records() {
        let buffer = LiquidationBuffer::new(Duration::from_secs(3600), 100);
        let now = Utc::now();

        buffer
            .push(record(dec!(1), LiquidationSide::Buy, now - chrono::Duration::hours(2)))
            .await;
        buffer.push(record(dec!(2), LiquidationSide::Buy, now)).await;

        assert_eq!(buffer.len().await, 1);
    }

    #[tokio::test]
    async fn test_message_loop_subscribes_and_buffers() {
        let (ws_tx, ws_rx) = mpsc::channel(10);
        let (send_tx, mut send_rx) = mpsc::channel(10);
        let buffer = LiquidationBuffer::new(Duration::from_secs(4 * 3600), 50);
        let loop_buffer = buffer.clone();

        let handle = tokio::spawn(async move {
            LiquidationStream::run_message_loop(
                ws_rx,
                send_tx,
                "SUBSCRIBE".to_string(),
                "PEPEUSDT".to_string(),
                loop_buffer,
            )
            .await;
        });

        ws_tx.send(WsMessage::Connected).await.unwrap();

        // The heartbeat fires immediately, so skip pings until the subscription shows up
        let mut subscribed = false;
        for _ in 0..3 {
            if send_rx.recv().await.unwrap() == "SUBSCRIBE" {
                subscribed = true;
                break;
            }
        }
        assert!(subscribed);

        let ts = Utc::now().timestamp_millis();
        let msg = format!(
            r#"{{"topic":"allLiquidation.PEPEUSDT","data":[{{"T":{ts},"s":"PEPEUSDT","S":"Buy","v":"1","p":"0.0000079"}}]}}"#
        );
        ws_tx.send(WsMessage::Text(msg)).await.unwrap();
        ws_tx.send(WsMessage::Disconnected).await.unwrap();
        handle.await.unwrap();

        assert_eq!(buffer.len().await, 1);
    }
}
