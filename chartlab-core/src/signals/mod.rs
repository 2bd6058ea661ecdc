//! Signal generation: discrete buy/sell cues from indicator crossovers.
//!
//! Signals are pure functions of candles and indicator series. They never see
//! backtest or model state; the signal filter scores them afterwards without
//! mutating the originals.

pub mod crossover;

pub use crossover::{generate_signals, CrossWindow};
