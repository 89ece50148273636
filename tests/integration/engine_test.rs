//! Engine tests against a mocked Bybit REST API

use chrono::Utc;
use liq_hunter::config::Config;
use liq_hunter::engine::{Clock, CycleOutcome, Engine, EquitySnapshot, LoopState, ManualClock};
use liq_hunter::error::CycleErrorKind;
use liq_hunter::execution::{ExecutionVenue, PaperVenue};
use liq_hunter::market::{
    BybitClient, BybitConfig, LiquidationBuffer, LiquidationRecord, LiquidationSide,
};
use liq_hunter::signal::{Direction, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONFIG: &str = r#"
    [instrument]
    symbol = "PEPEUSDT"

    [risk]
    rsi_length = 14
    rsi_oversold = 30
    rsi_overbought = 70
    vol_threshold = 1.5
    risk_per_trade = 0.01
    take_profit = 0.05
    stop_loss = 0.03

    [execution]
    initial_equity = 10000
    fee_rate = 0
"#;

type TestEngine = Engine<BybitClient, PaperVenue, ManualClock>;

/// 30 falling five-minute candles, newest first, with a volume spike on the
/// newest
fn kline_body() -> serde_json::Value {
    let newest_start: i64 = 1_700_000_000_000;
    let list: Vec<Vec<String>> = (0..30)
        .map(|i: i64| {
            let close = dec!(0.0000081) + Decimal::new(i, 8);
            let volume = if i == 0 { "400" } else { "100" };
            vec![
                (newest_start - i * 300_000).to_string(),
                close.to_string(),
                close.to_string(),
                close.to_string(),
                close.to_string(),
                volume.to_string(),
                "0".to_string(),
            ]
        })
        .collect();

    serde_json::json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": {"category": "linear", "symbol": "PEPEUSDT", "list": list}
    })
}

fn ticker_body(price: &str) -> serde_json::Value {
    serde_json::json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": {"category": "linear", "list": [{"symbol": "PEPEUSDT", "lastPrice": price}]}
    })
}

async fn mount_market(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v5/market/kline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kline_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v5/market/tickers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ticker_body("0.0000080")))
        .mount(server)
        .await;
}

async fn build_engine(server: &MockServer) -> TestEngine {
    let config = Config::from_toml(CONFIG).unwrap();

    let buffer = LiquidationBuffer::new(config.engine.liquidation_lookback(), 100);
    buffer
        .push(LiquidationRecord {
            price: dec!(0.0000079),
            size: dec!(5000000),
            side: LiquidationSide::Buy,
            timestamp: Utc::now(),
        })
        .await;

    let gate = BybitClient::new(
        BybitConfig {
            base_url: server.uri(),
            ..Default::default()
        },
        buffer,
    )
    .unwrap();
    let venue = PaperVenue::new(config.execution.initial_equity, config.execution.fee_rate);
    let clock = ManualClock::new(Utc::now());
    let baseline = EquitySnapshot::new(venue.equity().await.unwrap(), clock.now());

    Engine::new(gate, venue, clock, config.risk, config.engine, baseline)
}

#[tokio::test]
async fn test_liquidation_bounce_fires_long() {
    let server = MockServer::start().await;
    mount_market(&server).await;
    let mut engine = build_engine(&server).await;

    let outcome = engine.run_cycle().await.unwrap();

    let CycleOutcome::Fired {
        features,
        signal,
        order,
        ..
    } = outcome
    else {
        panic!("expected an order");
    };
    assert_eq!(features.rsi, dec!(0));
    assert_eq!(features.levels.support, Some(dec!(0.0000079)));
    assert_eq!(signal.direction, Direction::Long);
    assert!(signal.rationale.contains("0.0000079"));
    assert_eq!(order.side, Side::Long);
    assert_eq!(order.quantity, dec!(12500000));
    assert_eq!(order.take_profit_price, dec!(0.0000084));
    assert_eq!(order.stop_loss_price, dec!(0.00000776));
}

#[tokio::test]
async fn test_persisting_setup_submits_once() {
    let server = MockServer::start().await;
    mount_market(&server).await;
    let mut engine = build_engine(&server).await;

    assert_eq!(engine.step().await, LoopState::Polling);
    assert_eq!(engine.step().await, LoopState::Polling);
    assert_eq!(engine.step().await, LoopState::Polling);

    assert_eq!(engine.venue().fills().await.len(), 1);
    assert_eq!(engine.clock().sleeps(), vec![Duration::from_secs(10); 3]);
}

#[tokio::test]
async fn test_outage_backs_off_and_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v5/market/kline"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_market(&server).await;
    let mut engine = build_engine(&server).await;
    let params_before = engine.params().clone();
    let baseline_before = *engine.baseline();

    assert_eq!(engine.step().await, LoopState::Backoff);
    assert!(engine.venue().fills().await.is_empty());

    assert_eq!(engine.step().await, LoopState::Polling);
    assert_eq!(engine.venue().fills().await.len(), 1);

    assert_eq!(
        engine.clock().sleeps(),
        vec![Duration::from_secs(30), Duration::from_secs(10)]
    );
    assert_eq!(engine.params(), &params_before);
    assert_eq!(engine.baseline(), &baseline_before);
}

#[tokio::test]
async fn test_rejected_ticker_is_data_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v5/market/kline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kline_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v5/market/tickers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "retCode": 10001,
            "retMsg": "params error",
            "result": {}
        })))
        .mount(&server)
        .await;
    let mut engine = build_engine(&server).await;

    let err = engine.run_cycle().await.unwrap_err();

    assert_eq!(err.kind(), CycleErrorKind::DataUnavailable);
    assert!(err.to_string().contains("10001"));
}

#[tokio::test]
async fn test_far_from_support_waits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v5/market/kline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kline_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v5/market/tickers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ticker_body("0.0000090")))
        .mount(&server)
        .await;
    let mut engine = build_engine(&server).await;

    let outcome = engine.run_cycle().await.unwrap();

    assert_eq!(outcome.label(), "waiting");
    assert!(engine.venue().fills().await.is_empty());
}
