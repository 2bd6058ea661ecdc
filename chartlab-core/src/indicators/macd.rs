//! Moving Average Convergence-Divergence (MACD).
//!
//! line = EMA(fast) - EMA(slow)
//! signal = EMA(signal_period) over the line, with 0.0 substituted wherever the
//! line is undefined (the signal line therefore warms up on zeros)
//! histogram = line - signal

use serde::{Deserialize, Serialize};

use super::ema::ema_of_series;
use super::IndicatorSeries;
use crate::domain::{closes, Candle};

/// MACD periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// The three MACD output series, each aligned with the candle series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

#[derive(Debug, Clone)]
pub struct Macd {
    params: MacdParams,
}

impl Macd {
    pub fn new(params: MacdParams) -> Self {
        Self { params }
    }

    /// Leading entries of the histogram that are always undefined.
    pub fn lookback(&self) -> usize {
        let line = self.params.fast.max(self.params.slow).saturating_sub(1);
        line.max(self.params.signal.saturating_sub(1))
    }

    pub fn compute(&self, candles: &[Candle]) -> MacdSeries {
        macd(candles, self.params)
    }
}

/// MACD of candle closes.
pub fn macd(candles: &[Candle], params: MacdParams) -> MacdSeries {
    let values = closes(candles);
    let fast = ema_of_series(&values, params.fast);
    let slow = ema_of_series(&values, params.slow);

    let line: IndicatorSeries = fast
        .iter()
        .zip(slow.iter())
        .map(|(f, s)| Some(f? - s?))
        .collect();

    let substituted: Vec<f64> = line.iter().map(|v| v.unwrap_or(0.0)).collect();
    let signal = ema_of_series(&substituted, params.signal);

    let histogram: IndicatorSeries = line
        .iter()
        .zip(signal.iter())
        .map(|(l, s)| Some(l? - s?))
        .collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}
