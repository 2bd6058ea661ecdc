//! Domain types for ChartLab

pub mod candle;
pub mod signal;
pub mod tick;

pub use candle::{closes, Candle, TIME_LABEL_FORMAT};
pub use signal::{SignalDirection, TradeSignal};
pub use tick::Tick;
