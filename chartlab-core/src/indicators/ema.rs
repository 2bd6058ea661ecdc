//! Exponential Moving Average (EMA).
//!
//! Seed: EMA[period-1] = SMA of the first `period` closes.
//! Recursive: EMA[t] = (close[t] - EMA[t-1]) * k + EMA[t-1], k = 2 / (period + 1).
//! Lookback: period - 1.

use super::{Indicator, IndicatorSeries};
use crate::domain::{closes, Candle};

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> IndicatorSeries {
        ema(candles, self.period)
    }
}

/// EMA of candle closes.
pub fn ema(candles: &[Candle], period: usize) -> IndicatorSeries {
    ema_of_series(&closes(candles), period)
}

/// EMA over an arbitrary value series.
/// Used directly by MACD for the signal line.
pub fn ema_of_series(values: &[f64], period: usize) -> IndicatorSeries {
    let n = values.len();
    if period == 0 || n < period {
        return IndicatorSeries::undefined(n);
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;

    let tail = values[period..].iter().scan(seed, |prev, &value| {
        *prev = (value - *prev) * k + *prev;
        Some(Some(*prev))
    });

    std::iter::repeat(None)
        .take(period - 1)
        .chain(std::iter::once(Some(seed)))
        .chain(tail)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, sma, DEFAULT_EPSILON};

    #[test]
    fn ema_2_scenario() {
        let candles = make_candles(&[10.0, 11.0, 9.0, 12.0, 13.0]);
        let result = ema(&candles, 2);
        let k = 2.0 / 3.0;

        assert_eq!(result.get(0), None);
        assert_eq!(result.get(1), Some(10.5));
        let e2 = (9.0 - 10.5) * k + 10.5;
        assert_approx(result.get(2).unwrap(), e2, DEFAULT_EPSILON);
        assert_approx(result.get(2).unwrap(), 9.5, 1e-9);
        let e3 = (12.0 - e2) * k + e2;
        assert_approx(result.get(3).unwrap(), e3, DEFAULT_EPSILON);
        let e4 = (13.0 - e3) * k + e3;
        assert_approx(result.get(4).unwrap(), e4, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_period_1_equals_close() {
        let candles = make_candles(&[100.0, 200.0, 300.0]);
        let result = Ema::new(1).compute(&candles);
        assert_approx(result.get(0).unwrap(), 100.0, DEFAULT_EPSILON);
        assert_approx(result.get(1).unwrap(), 200.0, DEFAULT_EPSILON);
        assert_approx(result.get(2).unwrap(), 300.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_3_known_values() {
        // k = 0.5, seed at index 2: SMA(10,11,12) = 11.0
        // EMA[3] = (13 - 11) * 0.5 + 11 = 12.0
        // EMA[4] = (14 - 12) * 0.5 + 12 = 13.0
        let candles = make_candles(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = ema(&candles, 3);

        assert_eq!(result.get(0), None);
        assert_eq!(result.get(1), None);
        assert_approx(result.get(2).unwrap(), 11.0, DEFAULT_EPSILON);
        assert_approx(result.get(3).unwrap(), 12.0, DEFAULT_EPSILON);
        assert_approx(result.get(4).unwrap(), 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_seed_equals_sma_exactly() {
        let candles = make_candles(&[10.1, 10.7, 9.3, 12.9, 13.3, 11.1, 10.0]);
        for period in 1..=7 {
            let e = ema(&candles, period);
            let s = sma(&candles, period);
            assert_eq!(e.get(period - 1), s.get(period - 1), "period {period}");
        }
    }

    #[test]
    fn ema_short_series_is_undefined() {
        let candles = make_candles(&[10.0, 11.0]);
        let result = ema(&candles, 3);
        assert_eq!(result.len(), 2);
        assert!(result.is_all_undefined());
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(20).lookback(), 19);
        assert_eq!(Ema::new(1).lookback(), 0);
    }
}
