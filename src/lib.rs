//! liq-hunter: liquidation-cluster momentum trader for a single Bybit perpetual
//!
//! This library provides the core components for:
//! - Candles, last price, and forced liquidations from Bybit's public v5 API
//! - RSI, volume ratio, and liquidation support/resistance features
//! - Long/short signal evaluation with same-side cooldown
//! - Fixed-fraction sizing with take-profit/stop-loss brackets
//! - Paper execution venue
//! - Poll/backoff execution loop with an injectable clock
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod features;
pub mod market;
pub mod risk;
pub mod signal;
pub mod telemetry;
pub mod ws;
