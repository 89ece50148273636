//! Benchmarks for feature extraction and signal evaluation

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use liq_hunter::config::RiskParameters;
use liq_hunter::features::{FeatureExtractor, LiquidationOrder};
use liq_hunter::market::{Candle, LiquidationRecord, LiquidationSide};
use liq_hunter::signal::evaluate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn candles(count: i64) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| Candle {
            open_time: start + Duration::minutes(5 * i),
            close: dec!(0.0000080) + Decimal::new((i * 7) % 13, 9),
            volume: Decimal::from(1000 + (i * 37) % 500),
        })
        .collect()
}

fn liquidations(count: i64) -> Vec<LiquidationRecord> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| LiquidationRecord {
            price: dec!(0.0000079) + Decimal::new(i % 5, 9),
            size: dec!(1000000),
            side: if i % 2 == 0 {
                LiquidationSide::Buy
            } else {
                LiquidationSide::Sell
            },
            timestamp: start + Duration::seconds(i),
        })
        .collect()
}

fn benchmark_extract(c: &mut Criterion) {
    let extractor = FeatureExtractor::new(14, LiquidationOrder::OldestFirst);
    let candles = candles(100);
    let liquidations = liquidations(50);

    c.bench_function("extract_100_candles", |b| {
        b.iter(|| {
            extractor.extract(
                black_box(&candles),
                black_box(&liquidations),
                black_box(dec!(0.0000080)),
            )
        })
    });
}

fn benchmark_evaluate(c: &mut Criterion) {
    let extractor = FeatureExtractor::new(14, LiquidationOrder::OldestFirst);
    let features = extractor
        .extract(&candles(100), &liquidations(50), dec!(0.0000080))
        .unwrap();
    let params = RiskParameters {
        rsi_length: 14,
        rsi_oversold: dec!(30),
        rsi_overbought: dec!(70),
        vol_threshold: dec!(1.5),
        risk_per_trade: dec!(0.01),
        take_profit: dec!(0.05),
        stop_loss: dec!(0.03),
    };

    c.bench_function("evaluate_signal", |b| {
        b.iter(|| evaluate(black_box(&features), black_box(&params)))
    });
}

criterion_group!(benches, benchmark_extract, benchmark_evaluate);
criterion_main!(benches);
