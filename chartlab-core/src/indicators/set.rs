//! Batch indicator computation for one candle series.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Ema, Indicator, IndicatorSeries, Macd, MacdParams, MacdSeries, Rsi, Sma};
use crate::domain::Candle;

/// Which indicators to compute. Each one is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorRequest {
    pub sma_period: Option<usize>,
    pub ema_period: Option<usize>,
    pub rsi_period: Option<usize>,
    pub macd: Option<MacdParams>,
}

/// Computed indicators; omitted ones stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub sma: Option<IndicatorSeries>,
    pub ema: Option<IndicatorSeries>,
    pub rsi: Option<IndicatorSeries>,
    pub macd: Option<MacdSeries>,
}

fn compute_one(indicator: &dyn Indicator, candles: &[Candle]) -> IndicatorSeries {
    let series = indicator.compute(candles);
    trace!(
        indicator = indicator.name(),
        lookback = indicator.lookback(),
        defined_from = ?series.first_defined(),
        "indicator computed"
    );
    series
}

pub fn compute_indicators(candles: &[Candle], request: &IndicatorRequest) -> IndicatorSet {
    IndicatorSet {
        sma: request.sma_period.map(|p| compute_one(&Sma::new(p), candles)),
        ema: request.ema_period.map(|p| compute_one(&Ema::new(p), candles)),
        rsi: request.rsi_period.map(|p| compute_one(&Rsi::new(p), candles)),
        macd: request.macd.map(|params| {
            let indicator = Macd::new(params);
            trace!(lookback = indicator.lookback(), "macd computed");
            indicator.compute(candles)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{ema, macd, make_candles, rsi, sma};

    #[test]
    fn omitted_indicators_are_not_computed() {
        let candles = make_candles(&[1.0, 2.0, 3.0, 4.0]);
        let request = IndicatorRequest {
            sma_period: Some(2),
            ..Default::default()
        };
        let set = compute_indicators(&candles, &request);
        assert!(set.sma.is_some());
        assert!(set.ema.is_none());
        assert!(set.rsi.is_none());
        assert!(set.macd.is_none());
    }

    #[test]
    fn batch_matches_single_indicators() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.4).sin() * 5.0).collect();
        let candles = make_candles(&closes);
        let request = IndicatorRequest {
            sma_period: Some(5),
            ema_period: Some(4),
            rsi_period: Some(6),
            macd: Some(MacdParams::default()),
        };
        let set = compute_indicators(&candles, &request);
        assert_eq!(set.sma, Some(sma(&candles, 5)));
        assert_eq!(set.ema, Some(ema(&candles, 4)));
        assert_eq!(set.rsi, Some(rsi(&candles, 6)));
        assert_eq!(set.macd, Some(macd(&candles, MacdParams::default())));
        assert_eq!(set.sma.unwrap().first_defined(), Some(Sma::new(5).lookback()));
        assert_eq!(set.rsi.unwrap().first_defined(), Some(Rsi::new(6).lookback()));
    }

    #[test]
    fn zero_period_is_undefined_not_a_panic() {
        let candles = make_candles(&[1.0, 2.0, 3.0]);
        let request = IndicatorRequest {
            sma_period: Some(0),
            ema_period: Some(0),
            rsi_period: Some(0),
            macd: None,
        };
        let set = compute_indicators(&candles, &request);
        assert!(set.sma.unwrap().is_all_undefined());
        assert!(set.ema.unwrap().is_all_undefined());
        assert!(set.rsi.unwrap().is_all_undefined());
        assert_eq!(Sma::new(0).lookback(), 0);
    }

    #[test]
    fn every_series_matches_candle_length() {
        let candles = make_candles(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let request = IndicatorRequest {
            sma_period: Some(3),
            ema_period: Some(3),
            rsi_period: Some(3),
            macd: Some(MacdParams::default()),
        };
        let set = compute_indicators(&candles, &request);
        assert_eq!(set.sma.unwrap().len(), 5);
        assert_eq!(set.ema.unwrap().len(), 5);
        assert_eq!(set.rsi.unwrap().len(), 5);
        assert_eq!(set.macd.unwrap().histogram.len(), 5);
    }
}
