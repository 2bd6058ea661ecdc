//! Tick ingestion, candle aggregation and storage boundary

pub mod aggregate;
pub mod feed;
pub mod provider;

pub use aggregate::{aggregate, CandleAggregator, PricePoint};
pub use feed::{decode_ticks, ScripPrice, DEFAULT_UTC_OFFSET_MINUTES};
pub use provider::{
    check_candles, merge_candles, CandleStore, DataError, MemoryCandleStore, TickSource,
};
