//! Candle aggregation: groups ticks or finer candles into fixed-width buckets.
//!
//! Bucket start is the input timestamp truncated to a multiple of the bucket
//! width *within the hour*. A width of 60 minutes or more therefore yields
//! hourly buckets.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime, Timelike};

use crate::domain::{Candle, Tick};

/// Anything that can be folded into a candle.
///
/// A tick contributes its price to all four OHLC slots; a finer candle
/// contributes its own OHLC values.
pub trait PricePoint {
    fn timestamp(&self) -> NaiveDateTime;
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;
    fn volume(&self) -> f64;
}

impl PricePoint for Tick {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
    fn open(&self) -> f64 {
        self.price
    }
    fn high(&self) -> f64 {
        self.price
    }
    fn low(&self) -> f64 {
        self.price
    }
    fn close(&self) -> f64 {
        self.price
    }
    fn volume(&self) -> f64 {
        self.quantity
    }
}

impl PricePoint for Candle {
    fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
    fn open(&self) -> f64 {
        self.open
    }
    fn high(&self) -> f64 {
        self.high
    }
    fn low(&self) -> f64 {
        self.low
    }
    fn close(&self) -> f64 {
        self.close
    }
    fn volume(&self) -> f64 {
        self.volume
    }
}

/// Fixed-width candle aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandleAggregator {
    bucket_minutes: u32,
}

impl CandleAggregator {
    pub fn new(bucket_minutes: u32) -> Self {
        assert!(bucket_minutes >= 1, "bucket width must be >= 1 minute");
        Self { bucket_minutes }
    }

    pub fn bucket_minutes(&self) -> u32 {
        self.bucket_minutes
    }

    /// Start of the bucket containing `ts`.
    pub fn bucket_start(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let excess_secs = i64::from(ts.minute() % self.bucket_minutes) * 60 + i64::from(ts.second());
        ts - Duration::seconds(excess_secs) - Duration::nanoseconds(i64::from(ts.nanosecond()))
    }

    /// Aggregate `inputs` into one candle per distinct bucket, ascending.
    ///
    /// Inputs need not be sorted. Within a bucket the open comes from the
    /// earliest input and the close from the latest; equal timestamps are
    /// resolved by input order (first wins the open, last wins the close).
    pub fn aggregate<P: PricePoint>(&self, inputs: &[P]) -> Vec<Candle> {
        let mut buckets: BTreeMap<NaiveDateTime, Bucket> = BTreeMap::new();
        for point in inputs {
            buckets
                .entry(self.bucket_start(point.timestamp()))
                .and_modify(|b| b.absorb(point))
                .or_insert_with(|| Bucket::start(point));
        }

        let candles: Vec<Candle> = buckets
            .into_iter()
            .map(|(timestamp, b)| Candle {
                timestamp,
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
                volume: b.volume,
            })
            .collect();

        tracing::debug!(
            inputs = inputs.len(),
            candles = candles.len(),
            bucket_minutes = self.bucket_minutes,
            "aggregated candles"
        );
        candles
    }
}

/// Convenience wrapper: aggregate with a one-off aggregator.
pub fn aggregate<P: PricePoint>(inputs: &[P], bucket_minutes: u32) -> Vec<Candle> {
    CandleAggregator::new(bucket_minutes).aggregate(inputs)
}

struct Bucket {
    open_ts: NaiveDateTime,
    close_ts: NaiveDateTime,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl Bucket {
    fn start<P: PricePoint>(p: &P) -> Self {
        Self {
            open_ts: p.timestamp(),
            close_ts: p.timestamp(),
            open: p.open(),
            high: p.high(),
            low: p.low(),
            close: p.close(),
            volume: p.volume(),
        }
    }

    fn absorb<P: PricePoint>(&mut self, p: &P) {
        let ts = p.timestamp();
        if ts < self.open_ts {
            self.open_ts = ts;
            self.open = p.open();
        }
        if ts >= self.close_ts {
            self.close_ts = ts;
            self.close = p.close();
        }
        self.high = self.high.max(p.high());
        self.low = self.low.min(p.low());
        self.volume += p.volume();
    }
}
