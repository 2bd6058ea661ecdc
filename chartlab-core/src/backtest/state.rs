//! Backtest configuration and result types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Starting equity of every run (unitless).
pub const INITIAL_EQUITY: f64 = 10_000.0;

/// Stop-loss / take-profit distances, in percent of the entry price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            stop_loss_pct: 2.0,
            take_profit_pct: 5.0,
        }
    }
}

impl BacktestConfig {
    pub fn stop_price(&self, entry_price: f64) -> f64 {
        entry_price * (1.0 - self.stop_loss_pct / 100.0)
    }

    pub fn target_price(&self, entry_price: f64) -> f64 {
        entry_price * (1.0 + self.take_profit_pct / 100.0)
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    Crossover,
}

/// A long position still open when the data ran out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub entry_index: usize,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
}

/// A completed round trip of one implicit unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    // ── Entry ──
    pub entry_index: usize,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_index: usize,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,
    pub exit_reason: ExitReason,

    // ── PnL ──
    pub profit: f64,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }

    pub fn candles_held(&self) -> usize {
        self.exit_index - self.entry_index
    }
}

/// Output of a backtest run.
///
/// `max_drawdown` is the spread between the highest and lowest equity seen
/// over the whole run, not an ordered peak-before-trough drawdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_profit: f64,
    pub max_drawdown: f64,
    /// Equity after each step, starting at candle index 1.
    pub equity_curve: Vec<f64>,
    pub trade_log: Vec<String>,
    pub alert_log: Vec<String>,
    pub trades: Vec<TradeRecord>,
    /// Position left open at the end of data; counted as neither win nor loss.
    pub open_position: Option<OpenPosition>,
}

impl BacktestResult {
    /// Wins over closed trades; 0.0 when nothing closed.
    pub fn win_rate(&self) -> f64 {
        let closed = self.wins + self.losses;
        if closed == 0 {
            return 0.0;
        }
        self.wins as f64 / closed as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_distances() {
        let config = BacktestConfig::default();
        assert!((config.stop_price(100.0) - 98.0).abs() < 1e-9);
        assert!((config.target_price(100.0) - 105.0).abs() < 1e-9);
    }

    #[test]
    fn win_rate_ignores_open_position() {
        let result = BacktestResult {
            total_trades: 3,
            wins: 1,
            losses: 1,
            ..Default::default()
        };
        assert_eq!(result.win_rate(), 0.5);
        assert_eq!(BacktestResult::default().win_rate(), 0.0);
    }
}
