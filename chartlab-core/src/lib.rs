//! ChartLab Core: candle aggregation, indicators, crossover signals,
//! backtesting and the model layer.
//!
//! This crate contains the pure analysis pipeline:
//! - Domain types (ticks, candles, trade signals)
//! - Tick feed decoding and time-bucket aggregation into candles
//! - SMA / EMA / RSI / MACD over candle closes
//! - SMA/EMA crossover signals
//! - Single-position backtest with stop-loss and take-profit
//! - Feature vectors, stump-forest signal filter and KNN forecast
//!
//! Nothing here does I/O beyond the storage traits; the runner crate wires
//! stores, configuration and scheduling around it.

pub mod backtest;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod ml;
pub mod rng;
pub mod signals;
