//! Simple Moving Average (SMA).
//!
//! Arithmetic mean of the trailing `period` closes.
//! Lookback: period - 1 (first defined value at index period-1).

use super::{Indicator, IndicatorSeries};
use crate::domain::{closes, Candle};

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> IndicatorSeries {
        sma(candles, self.period)
    }
}

/// SMA of candle closes.
pub fn sma(candles: &[Candle], period: usize) -> IndicatorSeries {
    sma_of_series(&closes(candles), period)
}

/// SMA over an arbitrary value series.
///
/// Each window is summed from scratch rather than rolled, so the value at
/// `period - 1` is bit-identical to the EMA seed over the same values.
pub fn sma_of_series(values: &[f64], period: usize) -> IndicatorSeries {
    let n = values.len();
    if period == 0 || n < period {
        return IndicatorSeries::undefined(n);
    }
    let p = period as f64;
    std::iter::repeat(None)
        .take(period - 1)
        .chain(values.windows(period).map(|w| Some(w.iter().sum::<f64>() / p)))
        .collect()
}
