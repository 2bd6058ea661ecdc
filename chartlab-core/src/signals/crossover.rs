//! SMA/EMA crossover detection.
//!
//! Fires Buy when the slow series moves from strictly below the fast series to
//! at-or-above it, and Sell on the mirrored downward move. Both series must be
//! defined on the current and previous candle.

use crate::domain::{Candle, SignalDirection, TradeSignal};
use crate::indicators::IndicatorSeries;

/// Values of two series on consecutive candles `i - 1` and `i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossWindow {
    pub slow_prev: f64,
    pub fast_prev: f64,
    pub slow_cur: f64,
    pub fast_cur: f64,
}

impl CrossWindow {
    /// `None` for index 0 or when any of the four values is undefined.
    pub fn at(slow: &IndicatorSeries, fast: &IndicatorSeries, index: usize) -> Option<Self> {
        let prev = index.checked_sub(1)?;
        Some(Self {
            slow_prev: slow.get(prev)?,
            fast_prev: fast.get(prev)?,
            slow_cur: slow.get(index)?,
            fast_cur: fast.get(index)?,
        })
    }

    /// Fast series moved from at-or-below the slow series to strictly above it.
    pub fn fast_crossed_above(&self) -> bool {
        self.fast_cur > self.slow_cur && self.fast_prev <= self.slow_prev
    }

    /// Fast series moved from at-or-above the slow series to strictly below it.
    pub fn fast_crossed_below(&self) -> bool {
        self.fast_cur < self.slow_cur && self.fast_prev >= self.slow_prev
    }

    /// Crossover direction under the signal-generator rule.
    pub fn direction(&self) -> Option<SignalDirection> {
        if self.slow_prev < self.fast_prev && self.slow_cur >= self.fast_cur {
            Some(SignalDirection::Buy)
        } else if self.slow_prev > self.fast_prev && self.slow_cur <= self.fast_cur {
            Some(SignalDirection::Sell)
        } else {
            None
        }
    }
}

/// Emit crossover signals in ascending index order.
///
/// Series of different lengths produce no signals.
pub fn generate_signals(
    candles: &[Candle],
    slow: &IndicatorSeries,
    fast: &IndicatorSeries,
) -> Vec<TradeSignal> {
    if slow.len() != fast.len() {
        return Vec::new();
    }
    let n = slow.len().min(candles.len());

    (1..n)
        .filter_map(|i| {
            let direction = CrossWindow::at(slow, fast, i)?.direction()?;
            let candle = &candles[i];
            Some(TradeSignal {
                index: i,
                direction,
                timestamp: candle.timestamp,
                time_label: candle.time_label(),
                price: candle.close,
                confidence: None,
            })
        })
        .collect()
}
