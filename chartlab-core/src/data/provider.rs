//! Tick source and candle store traits, plus structured error types.
//!
//! Fetching raw ticks from the upstream price feed and persisting candles
//! live outside the analytics core. These traits are the boundary: the
//! refresh job drives them, and tests swap in in-memory implementations.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::{Candle, Tick};

/// Structured error types for data operations.
///
/// Designed to be displayable in CLI output and refresh-job logs.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("ticker not found: {ticker}")]
    TickerNotFound { ticker: String },

    #[error("feed format changed: {0}")]
    FeedFormat(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Other(String),
}

/// Source of raw ticks (the upstream price feed).
pub trait TickSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// All tickers the source can deliver.
    fn list_tickers(&self) -> Result<Vec<String>, DataError>;

    /// Raw ticks for one ticker, in feed order.
    fn fetch_ticks(&self, ticker: &str) -> Result<Vec<Tick>, DataError>;
}

/// Persistent candle storage.
pub trait CandleStore: Send + Sync {
    /// All stored candles for `ticker`, ascending by timestamp.
    fn load(&self, ticker: &str) -> Result<Vec<Candle>, DataError>;

    /// Insert or replace candles by timestamp.
    ///
    /// A candle whose timestamp is already stored overwrites the stored one;
    /// the result stays ascending with unique timestamps.
    fn upsert(&self, ticker: &str, candles: &[Candle]) -> Result<(), DataError>;
}

/// Merge `incoming` into `existing` by timestamp, later values winning.
pub fn merge_candles(existing: Vec<Candle>, incoming: &[Candle]) -> Vec<Candle> {
    let mut by_ts: BTreeMap<NaiveDateTime, Candle> =
        existing.into_iter().map(|c| (c.timestamp, c)).collect();
    for candle in incoming {
        by_ts.insert(candle.timestamp, candle.clone());
    }
    by_ts.into_values().collect()
}

/// Reject a batch holding any candle that breaks the OHLC ordering or has
/// negative volume.
pub fn check_candles(ticker: &str, candles: &[Candle]) -> Result<(), DataError> {
    match candles.iter().find(|c| !c.is_sane()) {
        Some(bad) => Err(DataError::Store(format!(
            "{ticker}: malformed candle at {}",
            bad.time_label()
        ))),
        None => Ok(()),
    }
}

/// In-process candle store. Loading an unknown ticker yields an empty series.
#[derive(Debug, Default)]
pub struct MemoryCandleStore {
    candles: RwLock<HashMap<String, Vec<Candle>>>,
}

impl MemoryCandleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CandleStore for MemoryCandleStore {
    fn load(&self, ticker: &str) -> Result<Vec<Candle>, DataError> {
        let map = self
            .candles
            .read()
            .map_err(|_| DataError::Store("candle store lock poisoned".into()))?;
        Ok(map.get(ticker).cloned().unwrap_or_default())
    }

    fn upsert(&self, ticker: &str, candles: &[Candle]) -> Result<(), DataError> {
        check_candles(ticker, candles)?;
        let mut map = self
            .candles
            .write()
            .map_err(|_| DataError::Store("candle store lock poisoned".into()))?;
        let existing = map.remove(ticker).unwrap_or_default();
        map.insert(ticker.to_string(), merge_candles(existing, candles));
        Ok(())
    }
}
