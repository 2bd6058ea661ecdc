//! Runner entry points: load stored candles, re-bucket them to the chart
//! width and run the analysis.

use thiserror::Error;
use tracing::info;

use chartlab_core::data::{aggregate, CandleStore, DataError};

use crate::analysis::{analyze, ChartAnalysis};
use crate::config::{AnalysisConfig, ConfigError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("ticker '{0}' has no stored candles")]
    NoCandles(String),
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Analyse one ticker from the store.
///
/// A ticker with no stored candles is an error here; call [`analyze`]
/// directly to get an empty aggregate instead.
pub fn analyze_ticker(
    store: &dyn CandleStore,
    ticker: &str,
    config: &AnalysisConfig,
) -> Result<ChartAnalysis, RunError> {
    let stored = store.load(ticker)?;
    if stored.is_empty() {
        return Err(RunError::NoCandles(ticker.to_string()));
    }
    let candles = aggregate(&stored, config.chart.bucket_minutes);
    info!(
        ticker,
        stored = stored.len(),
        candles = candles.len(),
        bucket_minutes = config.chart.bucket_minutes,
        "analysing"
    );
    Ok(analyze(ticker, candles, config))
}

/// Pretty JSON of an analysis, as written by the CLI.
pub fn analysis_json(analysis: &ChartAnalysis) -> Result<String, RunError> {
    Ok(serde_json::to_string_pretty(analysis)?)
}
