//! Candle: the fundamental chart data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format used for human-readable bucket labels (`2024-03-05 11:15`).
pub const TIME_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// OHLCV candle for one time bucket.
///
/// `timestamp` is the bucket start. A candle series is ordered by ascending,
/// unique timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Bucket label as shown on chart axes and in signal lists.
    pub fn time_label(&self) -> String {
        self.timestamp.format(TIME_LABEL_FORMAT).to_string()
    }

    /// Returns true if any OHLCV field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.volume.is_nan()
    }

    /// OHLC ordering check: `low <= min(open, close) <= max(open, close) <= high`
    /// and non-negative volume.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.low <= self.open.min(self.close)
            && self.open.max(self.close) <= self.high
            && self.volume >= 0.0
    }
}

/// Extract the close prices of a candle series.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
