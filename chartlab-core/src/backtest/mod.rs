//! Backtest simulation over candle series.
//!
//! One long position at a time, entered on an EMA-over-SMA crossover and
//! closed by stop-loss, take-profit or the opposite crossover.

pub mod simulator;
pub mod state;

pub use simulator::run_backtest;
pub use state::{
    BacktestConfig, BacktestResult, ExitReason, OpenPosition, TradeRecord, INITIAL_EQUITY,
};
