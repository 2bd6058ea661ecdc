//! Property tests for analysis invariants.
//!
//! Uses proptest to verify:
//! 1. Warm-up: SMA/EMA/RSI are entirely undefined on series shorter than the period
//! 2. EMA seed: the first EMA value equals the SMA at the same index exactly
//! 3. RSI bounds: every defined value lies in [0, 100]
//! 4. MACD identity: histogram = line - signal wherever both are defined
//! 5. Aggregation idempotence: re-bucketing at the same width changes nothing
//! 6. Backtest exits: every exit is at the stop, the target or the candle close
//! 7. Model bounds: forest probability in [0, 1], KNN confidence in [0.5, 1]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use chartlab_core::backtest::{run_backtest, BacktestConfig, ExitReason};
use chartlab_core::data::aggregate;
use chartlab_core::domain::{Candle, Tick};
use chartlab_core::indicators::{ema, macd, rsi, sma, MacdParams};
use chartlab_core::ml::{predict_next_move, FeatureVector, Label, StumpForest};

// ── Strategies (proptest) ────────────────────────────────────────────

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(11, 0, 0)
        .unwrap()
}

fn candles_from(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            timestamp: base_time() + Duration::minutes(i as i64),
            open: close,
            high: close * 1.03,
            low: close * 0.97,
            close,
            volume: 1.0,
        })
        .collect()
}

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0), 0..max_len)
}

fn arb_vector() -> impl Strategy<Value = FeatureVector> {
    (-5.0..5.0_f64, 0.0..100.0_f64, -2.0..2.0_f64, -0.1..0.1_f64, any::<bool>()).prop_map(
        |(gap, rsi, macd_histogram, momentum, up)| FeatureVector {
            gap,
            rsi,
            macd_histogram,
            momentum,
            label: if up { Label::Up } else { Label::Down },
        },
    )
}

// ── 1-2. Warm-up and EMA seed ────────────────────────────────────────

proptest! {
    #[test]
    fn short_series_are_undefined(closes in arb_closes(20), extra in 1usize..10) {
        let candles = candles_from(&closes);
        let period = closes.len() + extra;
        prop_assert!(sma(&candles, period).is_all_undefined());
        prop_assert!(ema(&candles, period).is_all_undefined());
        prop_assert!(rsi(&candles, period).is_all_undefined());
    }

    #[test]
    fn ema_seed_equals_sma(closes in arb_closes(60), period in 1usize..20) {
        let candles = candles_from(&closes);
        let s = sma(&candles, period);
        let e = ema(&candles, period);
        if closes.len() >= period {
            let seed = period - 1;
            prop_assert_eq!(e.first_defined(), Some(seed));
            prop_assert_eq!(e.get(seed), s.get(seed));
        }
    }
}

// ── 3-4. RSI bounds and MACD identity ────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(closes in arb_closes(80), period in 1usize..20) {
        let values = rsi(&candles_from(&closes), period);
        for v in values.iter().flatten() {
            prop_assert!((0.0..=100.0).contains(&v), "rsi out of range: {}", v);
        }
    }

    #[test]
    fn histogram_is_line_minus_signal(closes in arb_closes(80)) {
        let out = macd(&candles_from(&closes), MacdParams::default());
        for i in 0..closes.len() {
            match (out.line.get(i), out.signal.get(i)) {
                (Some(l), Some(s)) => prop_assert_eq!(out.histogram.get(i), Some(l - s)),
                _ => prop_assert_eq!(out.histogram.get(i), None),
            }
        }
    }
}

// ── 5. Aggregation idempotence ───────────────────────────────────────

proptest! {
    #[test]
    fn aggregation_is_idempotent(
        offsets in prop::collection::vec((0i64..6000, 1.0..500.0_f64), 0..200),
        width in 1u32..90,
    ) {
        let ticks: Vec<Tick> = offsets
            .iter()
            .map(|&(secs, price)| Tick {
                timestamp: base_time() + Duration::seconds(secs * 7),
                price,
                quantity: 1.0,
            })
            .collect();
        let once = aggregate(&ticks, width);
        let twice = aggregate(&once, width);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        let volume: f64 = once.iter().map(|c| c.volume).sum();
        prop_assert_eq!(volume, ticks.len() as f64);
    }
}

// ── 6. Backtest exits ────────────────────────────────────────────────

proptest! {
    #[test]
    fn exits_are_stop_target_or_close(
        closes in arb_closes(150),
        slow in 2usize..15,
        fast in 2usize..15,
    ) {
        let candles = candles_from(&closes);
        let config = BacktestConfig::default();
        let result = run_backtest(&candles, &sma(&candles, slow), &ema(&candles, fast), &config);

        prop_assert_eq!(result.equity_curve.len(), candles.len().saturating_sub(1));
        prop_assert_eq!(result.trades.len(), result.wins + result.losses);
        let open = usize::from(result.open_position.is_some());
        prop_assert_eq!(result.total_trades, result.trades.len() + open);

        for (i, trade) in result.trades.iter().enumerate() {
            let expected = match trade.exit_reason {
                ExitReason::StopLoss => config.stop_price(trade.entry_price),
                ExitReason::TakeProfit => config.target_price(trade.entry_price),
                ExitReason::Crossover => candles[trade.exit_index].close,
            };
            prop_assert_eq!(trade.exit_price, expected);
            prop_assert!(trade.exit_index >= trade.entry_index);
            // One position at a time.
            if let Some(next) = result.trades.get(i + 1) {
                prop_assert!(next.entry_index > trade.exit_index);
            }
        }
        prop_assert!(result.max_drawdown >= 0.0);
    }
}

// ── 7. Model bounds ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn forest_probability_is_bounded(
        training in prop::collection::vec(arb_vector(), 0..60),
        query in arb_vector(),
        trees in 0usize..40,
        seed in any::<u64>(),
    ) {
        let forest = StumpForest::train(&training, trees, seed);
        let p = forest.predict_probability(&query);
        prop_assert!((0.0..=1.0).contains(&p));
        if forest.is_empty() {
            prop_assert_eq!(p, 0.5);
        }
    }

    #[test]
    fn single_tree_forest_is_decisive(
        training in prop::collection::vec(arb_vector(), 1..60),
        query in arb_vector(),
        seed in any::<u64>(),
    ) {
        let p = StumpForest::train(&training, 1, seed).predict_probability(&query);
        prop_assert!(p == 0.0 || p == 1.0);
    }

    #[test]
    fn knn_confidence_for_odd_k(
        training in prop::collection::vec(arb_vector(), 0..40),
        query in arb_vector(),
        half in 0usize..6,
    ) {
        let k = 2 * half + 1;
        match predict_next_move(&training, Some(&query), k) {
            Some(p) => {
                prop_assert!(training.len() >= k);
                prop_assert!(p.confidence > 0.5 && p.confidence <= 1.0);
            }
            None => prop_assert!(training.len() < k),
        }
    }
}
