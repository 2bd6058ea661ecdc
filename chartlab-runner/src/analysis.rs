//! One-shot chart analysis: indicators, signals, backtest and model output
//! for a single candle series, collected into one result aggregate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use chartlab_core::backtest::{run_backtest, BacktestResult};
use chartlab_core::domain::{Candle, TradeSignal};
use chartlab_core::indicators::{compute_indicators, ema, rsi, sma, IndicatorSeries, MacdSeries};
use chartlab_core::ml::{
    build_features, build_vector_at_index, filter_signals, predict_next_move, FeatureInputs,
    KnnPrediction, SignalFilterReport,
};
use chartlab_core::rng::{SeedHierarchy, FILTER_FOREST};
use chartlab_core::signals::generate_signals;

use crate::config::AnalysisConfig;

/// A chart series together with the period it was computed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSeries {
    pub period: usize,
    pub values: IndicatorSeries,
}

/// Everything derived from one ticker's candles.
///
/// Optional fields stay `None` when their inputs were not configured or the
/// series was empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartAnalysis {
    pub ticker: String,
    pub candles: Vec<Candle>,
    pub sma: Option<PeriodSeries>,
    pub ema: Option<PeriodSeries>,
    pub rsi: Option<PeriodSeries>,
    pub macd: Option<MacdSeries>,
    /// Crossover signals, after the model filter when it ran.
    pub signals: Option<Vec<TradeSignal>>,
    pub backtest: Option<BacktestResult>,
    pub filter_report: Option<SignalFilterReport>,
    pub training_vectors: usize,
    pub prediction: Option<KnnPrediction>,
}

impl ChartAnalysis {
    pub fn empty(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            ..Default::default()
        }
    }
}

/// Run the full pipeline over candles already bucketed at the chart width.
pub fn analyze(ticker: &str, candles: Vec<Candle>, config: &AnalysisConfig) -> ChartAnalysis {
    if candles.is_empty() {
        return ChartAnalysis::empty(ticker);
    }

    let request = config.chart.indicator_request(config.macd);
    let set = compute_indicators(&candles, &request);
    let with_period = |period: Option<usize>, values: Option<IndicatorSeries>| {
        Some(PeriodSeries {
            period: period?,
            values: values?,
        })
    };
    let chart_sma = with_period(request.sma_period, set.sma);
    let chart_ema = with_period(request.ema_period, set.ema);
    let chart_rsi = with_period(request.rsi_period, set.rsi);
    let macd = set.macd.unwrap_or_default();

    let (raw_signals, backtest) = match (&chart_sma, &chart_ema) {
        (Some(slow), Some(fast)) => (
            Some(generate_signals(&candles, &slow.values, &fast.values)),
            Some(run_backtest(&candles, &slow.values, &fast.values, &config.backtest)),
        ),
        _ => (None, None),
    };

    // The model layer uses its own periods with the chart's MACD histogram.
    let model = &config.model;
    let ml_sma = sma(&candles, model.sma_period);
    let ml_ema = ema(&candles, model.ema_period);
    let ml_rsi = rsi(&candles, model.rsi_period);
    let inputs = FeatureInputs {
        candles: &candles,
        sma: &ml_sma,
        ema: &ml_ema,
        rsi: &ml_rsi,
        macd_histogram: &macd.histogram,
    };
    let training = build_features(&inputs, model.future_offset);

    let (signals, filter_report) = match raw_signals {
        Some(raw) if !raw.is_empty() => {
            let seed = SeedHierarchy::new(model.seed).sub_seed(ticker, FILTER_FOREST);
            let (kept, report) = filter_signals(&raw, &inputs, &training, model.tree_count, seed);
            (Some(kept), Some(report))
        }
        other => (other, None),
    };

    let latest = build_vector_at_index(&inputs, candles.len() - 1);
    let prediction = predict_next_move(&training, latest.as_ref(), model.neighbors);

    debug!(
        ticker,
        candles = candles.len(),
        training = training.len(),
        signals = signals.as_ref().map_or(0, Vec::len),
        predicted = prediction.is_some(),
        "chart analysed"
    );

    ChartAnalysis {
        ticker: ticker.to_string(),
        sma: chart_sma,
        ema: chart_ema,
        rsi: chart_rsi,
        macd: config.chart.show_macd.then_some(macd),
        signals,
        backtest,
        filter_report,
        training_vectors: training.len(),
        prediction,
        candles,
    }
}
