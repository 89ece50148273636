//! Configuration loading tests

use liq_hunter::config::Config;
use liq_hunter::features::LiquidationOrder;
use liq_hunter::telemetry::LogFormat;
use rust_decimal_macros::dec;
use std::io::Write;

#[test]
fn test_config_example_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();

    assert_eq!(config.instrument.symbol, "PEPEUSDT");
    assert_eq!(config.risk.rsi_length, 14);
    assert_eq!(config.risk.risk_per_trade, dec!(0.01));
    assert_eq!(config.engine.liquidation_order, LiquidationOrder::OldestFirst);
    assert_eq!(config.engine.signal_cooldown_secs, 300);
    assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
    assert!(config.telemetry.metrics_port.is_none());
}

#[test]
fn test_effective_config_round_trips() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();

    let printed = toml::to_string_pretty(&config).unwrap();
    let reparsed = Config::from_toml(&printed).unwrap();

    assert_eq!(reparsed.risk, config.risk);
    assert_eq!(reparsed.engine.backoff_secs, config.engine.backoff_secs);
    assert_eq!(reparsed.venue.ws_url, config.venue.ws_url);
}

#[test]
fn test_invalid_file_is_fatal() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"
        [instrument]
        symbol = "PEPEUSDT"

        [risk]
        rsi_length = 0
        rsi_oversold = 30
        rsi_overbought = 70
        vol_threshold = 1.5
        risk_per_trade = 0.01
        take_profit = 0.05
        stop_loss = 0.03
        "#,
    )
    .unwrap();

    let err = Config::load(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("rsi_length"));
}
