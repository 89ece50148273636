//! WebSocket client
//!
//! Reconnecting, bidirectional WebSocket client used by the liquidation
//! stream.

mod client;
mod types;

pub use client::WsClient;
pub use types::{WsConfig, WsError, WsMessage};
