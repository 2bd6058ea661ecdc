//! Relative Strength Index (RSI).
//!
//! Seed averages are plain means over the first `period` close-to-close
//! deltas; later values use Wilder smoothing:
//! avg = (avg * (period - 1) + x) / period.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), and exactly 100 when the
//! average loss is zero.
//! Lookback: period.

use super::{Indicator, IndicatorSeries};
use crate::domain::{closes, Candle};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> IndicatorSeries {
        rsi(candles, self.period)
    }
}

/// RSI of candle closes.
pub fn rsi(candles: &[Candle], period: usize) -> IndicatorSeries {
    rsi_of_series(&closes(candles), period)
}

/// RSI over an arbitrary value series.
pub fn rsi_of_series(values: &[f64], period: usize) -> IndicatorSeries {
    let n = values.len();
    if period == 0 || n < period + 1 {
        return IndicatorSeries::undefined(n);
    }

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let p = period as f64;

    let (gain_sum, loss_sum) = deltas[..period]
        .iter()
        .fold((0.0, 0.0), |(gain, loss), &d| {
            if d > 0.0 {
                (gain + d, loss)
            } else {
                (gain, loss - d)
            }
        });
    let seed = (gain_sum / p, loss_sum / p);

    let smoothed = deltas[period..].iter().scan(seed, |(avg_gain, avg_loss), &d| {
        let (gain, loss) = split_delta(d);
        *avg_gain = (*avg_gain * (p - 1.0) + gain) / p;
        *avg_loss = (*avg_loss * (p - 1.0) + loss) / p;
        Some(Some(rsi_from_averages(*avg_gain, *avg_loss)))
    });

    std::iter::repeat(None)
        .take(period)
        .chain(std::iter::once(Some(rsi_from_averages(seed.0, seed.1))))
        .chain(smoothed)
        .collect()
}

fn split_delta(delta: f64) -> (f64, f64) {
    if delta > 0.0 {
        (delta, 0.0)
    } else {
        (0.0, -delta)
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles};

    #[test]
    fn rsi_all_gains_is_100() {
        let candles = make_candles(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = rsi(&candles, 3);
        assert_eq!(result.get(3), Some(100.0));
        assert_eq!(result.get(5), Some(100.0));
    }

    #[test]
    fn rsi_flat_series_is_100() {
        // Zero average loss wins over "no movement".
        let candles = make_candles(&[50.0; 6]);
        let result = rsi(&candles, 3);
        assert_eq!(result.get(3), Some(100.0));
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let candles = make_candles(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = rsi(&candles, 3);
        assert_approx(result.get(3).unwrap(), 0.0, 1e-9);
    }

    #[test]
    fn rsi_seed_and_wilder_step() {
        // Deltas: +0.34, -0.25, -0.48, +0.72
        let candles = make_candles(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = rsi(&candles, 3);

        assert_eq!(result.get(0), None);
        assert_eq!(result.get(1), None);
        assert_eq!(result.get(2), None);

        let mut avg_gain = 0.34 / 3.0;
        let mut avg_loss = (0.25 + 0.48) / 3.0;
        assert_approx(
            result.get(3).unwrap(),
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss),
            1e-6,
        );

        avg_gain = (avg_gain * 2.0 + 0.72) / 3.0;
        avg_loss = (avg_loss * 2.0) / 3.0;
        assert_approx(
            result.get(4).unwrap(),
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss),
            1e-6,
        );
    }

    #[test]
    fn rsi_bounds() {
        let candles = make_candles(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = rsi(&candles, 3);
        for (i, v) in result.iter().enumerate() {
            if let Some(v) = v {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_needs_period_plus_one_candles() {
        let candles = make_candles(&[1.0, 2.0, 3.0]);
        assert!(rsi(&candles, 3).is_all_undefined());
        assert_eq!(rsi(&candles, 2).first_defined(), Some(2));
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 14);
        assert_eq!(Rsi::new(14).name(), "rsi_14");
    }
}
