//! Indicator engine: SMA, EMA, RSI and MACD over a candle series.
//!
//! Indicators are pure functions: candle history in, a series of the same
//! length out. Entries before the warm-up length are undefined (`None`), and a
//! series shorter than the warm-up is undefined throughout. Undefined is an
//! expected state, never an error.
//!
//! Recursive indicators (EMA, RSI) are folds carrying an explicit accumulator,
//! so each one stays a function of `(series, period)`.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod set;
pub mod sma;

pub use ema::{ema, ema_of_series, Ema};
pub use macd::{macd, Macd, MacdParams, MacdSeries};
pub use rsi::{rsi, rsi_of_series, Rsi};
pub use set::{compute_indicators, IndicatorRequest, IndicatorSet};
pub use sma::{sma, sma_of_series, Sma};

use serde::{Deserialize, Serialize};

use crate::domain::Candle;

/// Trait for single-series indicators.
///
/// # Look-ahead guard
/// No value at index `t` may depend on candles after `t`; computing over a
/// truncated series must reproduce the prefix of the full computation.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading entries that are always undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire candle series.
    fn compute(&self, candles: &[Candle]) -> IndicatorSeries;
}

/// Indicator output aligned 1:1 by index with a candle series.
///
/// Serializes as a JSON array with `null` for undefined entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSeries(Vec<Option<f64>>);

impl IndicatorSeries {
    /// A series of `len` undefined entries.
    pub fn undefined(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index`; `None` if undefined or out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.0.iter().copied()
    }

    /// Index of the first defined entry.
    pub fn first_defined(&self) -> Option<usize> {
        self.0.iter().position(Option::is_some)
    }

    pub fn is_all_undefined(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

impl From<Vec<Option<f64>>> for IndicatorSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self(values)
    }
}

impl FromIterator<Option<f64>> for IndicatorSeries {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Create synthetic candles from close prices for testing.
///
/// One candle per minute: open = prev close (or close for the first),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(11, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base + chrono::Duration::minutes(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
