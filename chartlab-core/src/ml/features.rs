//! Feature vectors for the model layer.
//!
//! Four raw features per candle: EMA/SMA gap, RSI, MACD histogram and
//! one-candle momentum. Training vectors carry a forward-looking label.

use serde::{Deserialize, Serialize};

use crate::domain::Candle;
use crate::indicators::IndicatorSeries;

/// Candles ahead used to label a training vector.
pub const DEFAULT_FUTURE_OFFSET: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Gap,
    Rsi,
    MacdHistogram,
    Momentum,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Gap,
        Feature::Rsi,
        Feature::MacdHistogram,
        Feature::Momentum,
    ];
}

/// Forward move of the close `future_offset` candles ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Up,
    Down,
    /// Query vectors built for prediction.
    Unlabeled,
}

impl Label {
    pub fn value(self) -> i8 {
        match self {
            Label::Up => 1,
            Label::Down => -1,
            Label::Unlabeled => 0,
        }
    }

    /// Votes count anything non-negative as bullish.
    pub fn is_bullish(self) -> bool {
        self.value() >= 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub gap: f64,
    pub rsi: f64,
    pub macd_histogram: f64,
    pub momentum: f64,
    pub label: Label,
}

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Gap => self.gap,
            Feature::Rsi => self.rsi,
            Feature::MacdHistogram => self.macd_histogram,
            Feature::Momentum => self.momentum,
        }
    }

    /// Euclidean distance over the four raw features.
    pub fn distance(&self, other: &FeatureVector) -> f64 {
        Feature::ALL
            .iter()
            .map(|&f| {
                let d = self.get(f) - other.get(f);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// Candles plus the model-layer indicator series, all index-aligned.
#[derive(Debug, Clone, Copy)]
pub struct FeatureInputs<'a> {
    pub candles: &'a [Candle],
    pub sma: &'a IndicatorSeries,
    pub ema: &'a IndicatorSeries,
    pub rsi: &'a IndicatorSeries,
    pub macd_histogram: &'a IndicatorSeries,
}

impl FeatureInputs<'_> {
    /// Unlabeled features at `index`, or `None` when any input is undefined
    /// there or the previous close is zero.
    fn raw_at(&self, index: usize) -> Option<FeatureVector> {
        let prev = index.checked_sub(1)?;
        let current = self.candles.get(index)?;
        let previous = &self.candles[prev];

        let sma = self.sma.get(index)?;
        let ema = self.ema.get(index)?;
        let rsi = self.rsi.get(index)?;
        let macd_histogram = self.macd_histogram.get(index)?;
        if previous.close == 0.0 {
            return None;
        }

        Some(FeatureVector {
            gap: ema - sma,
            rsi,
            macd_histogram,
            momentum: (current.close - previous.close) / previous.close,
            label: Label::Unlabeled,
        })
    }
}

/// Labeled training vectors for every index in `[1, len - future_offset)`.
pub fn build_features(inputs: &FeatureInputs<'_>, future_offset: usize) -> Vec<FeatureVector> {
    let candles = inputs.candles;
    let end = candles.len().saturating_sub(future_offset);

    (1..end)
        .filter_map(|i| {
            let mut vector = inputs.raw_at(i)?;
            vector.label = if candles[i + future_offset].close >= candles[i].close {
                Label::Up
            } else {
                Label::Down
            };
            Some(vector)
        })
        .collect()
}

/// Unlabeled vector for a single index; requires `0 < index < len`.
pub fn build_vector_at_index(inputs: &FeatureInputs<'_>, index: usize) -> Option<FeatureVector> {
    if index == 0 {
        return None;
    }
    inputs.raw_at(index)
}
