//! Periodic refresh: pull ticks for every ticker, bucket them into candles and
//! upsert into the candle store.
//!
//! Tickers are processed in parallel. A failing ticker is logged and recorded
//! in the summary; the others still complete.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use chartlab_core::data::{aggregate, CandleStore, DataError, TickSource};

/// Per-ticker outcome of one refresh pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TickerOutcome {
    Updated { ticks: usize, candles: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshSummary {
    /// `(ticker, outcome)` in ticker-list order.
    pub outcomes: Vec<(String, TickerOutcome)>,
    pub elapsed_ms: u64,
}

impl RefreshSummary {
    pub fn updated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, TickerOutcome::Updated { .. }))
            .count()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, TickerOutcome::Failed { .. }))
            .map(|(t, _)| t.as_str())
            .collect()
    }
}

fn refresh_one(
    source: &dyn TickSource,
    store: &dyn CandleStore,
    ticker: &str,
    bucket_minutes: u32,
) -> Result<TickerOutcome, DataError> {
    let ticks = source.fetch_ticks(ticker)?;
    let candles = aggregate(&ticks, bucket_minutes);
    store.upsert(ticker, &candles)?;
    debug!(ticker, ticks = ticks.len(), candles = candles.len(), "ticker refreshed");
    Ok(TickerOutcome::Updated {
        ticks: ticks.len(),
        candles: candles.len(),
    })
}

/// One refresh pass over every ticker the source lists.
///
/// Only a failure to list tickers aborts the pass.
pub fn refresh_tickers(
    source: &dyn TickSource,
    store: &dyn CandleStore,
    bucket_minutes: u32,
) -> Result<RefreshSummary, DataError> {
    let start = Instant::now();
    let tickers = source.list_tickers()?;

    let outcomes: Vec<(String, TickerOutcome)> = tickers
        .par_iter()
        .map(|ticker| {
            let outcome = match refresh_one(source, store, ticker, bucket_minutes) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "refresh failed");
                    TickerOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            (ticker.clone(), outcome)
        })
        .collect();

    let summary = RefreshSummary {
        outcomes,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        source = source.name(),
        tickers = tickers.len(),
        updated = summary.updated(),
        failed = summary.failed().len(),
        elapsed_ms = summary.elapsed_ms,
        "refresh pass complete"
    );
    Ok(summary)
}

/// Run refresh passes forever, `interval` apart. A pass that cannot list
/// tickers is logged and retried on the next tick.
pub fn run_refresh_loop(
    source: &dyn TickSource,
    store: &dyn CandleStore,
    bucket_minutes: u32,
    interval: Duration,
) -> ! {
    loop {
        if let Err(e) = refresh_tickers(source, store, bucket_minutes) {
            warn!(error = %e, "refresh pass aborted");
        }
        std::thread::sleep(interval);
    }
}
