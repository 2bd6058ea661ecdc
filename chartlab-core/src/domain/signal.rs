//! Trade signals emitted by crossover detection.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Directional cue of a crossover signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    Buy,
    Sell,
}

/// A buy/sell cue at a specific candle.
///
/// `confidence` is only set once a signal has been scored by the signal
/// filter; it is the bullish probability of the forest, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    /// Index into the candle series the signal was generated from.
    pub index: usize,
    pub direction: SignalDirection,
    pub timestamp: NaiveDateTime,
    pub time_label: String,
    pub price: f64,
    pub confidence: Option<f64>,
}
