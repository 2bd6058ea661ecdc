//! Single-position crossover backtest with stop-loss and take-profit exits.

use tracing::debug;

use super::state::{
    BacktestConfig, BacktestResult, ExitReason, OpenPosition, TradeRecord, INITIAL_EQUITY,
};
use crate::domain::Candle;
use crate::indicators::IndicatorSeries;
use crate::signals::CrossWindow;

#[derive(Debug, Clone, PartialEq)]
enum Position {
    Flat,
    Long(OpenPosition),
}

/// Mutable state carried across candles.
struct SimState {
    position: Position,
    equity: f64,
    running_max: f64,
    running_min: f64,
    result: BacktestResult,
}

impl SimState {
    fn new() -> Self {
        Self {
            position: Position::Flat,
            equity: INITIAL_EQUITY,
            running_max: INITIAL_EQUITY,
            running_min: INITIAL_EQUITY,
            result: BacktestResult::default(),
        }
    }

    fn enter(&mut self, index: usize, candle: &Candle) {
        let price = candle.close;
        self.result.total_trades += 1;
        self.result
            .trade_log
            .push(format!("Buy at {price:.2} on {}", candle.time_label()));
        self.position = Position::Long(OpenPosition {
            entry_index: index,
            entry_time: candle.timestamp,
            entry_price: price,
        });
    }

    fn close(
        &mut self,
        open: OpenPosition,
        index: usize,
        candle: &Candle,
        price: f64,
        reason: ExitReason,
    ) {
        let profit = price - open.entry_price;
        self.equity += profit;
        if profit > 0.0 {
            self.result.wins += 1;
        } else {
            self.result.losses += 1;
        }

        let label = candle.time_label();
        match reason {
            ExitReason::StopLoss => {
                self.result
                    .trade_log
                    .push(format!("Stop loss at {price:.2} on {label}"));
                self.result
                    .alert_log
                    .push(format!("Stop loss hit at {price:.2} on {label}"));
            }
            ExitReason::TakeProfit => {
                self.result
                    .trade_log
                    .push(format!("Take profit at {price:.2} on {label}"));
                self.result
                    .alert_log
                    .push(format!("Take profit hit at {price:.2} on {label}"));
            }
            ExitReason::Crossover => {
                self.result
                    .trade_log
                    .push(format!("Sell at {price:.2} on {label}"));
            }
        }

        self.result.trades.push(TradeRecord {
            entry_index: open.entry_index,
            entry_time: open.entry_time,
            entry_price: open.entry_price,
            exit_index: index,
            exit_time: candle.timestamp,
            exit_price: price,
            exit_reason: reason,
            profit,
        });
        self.position = Position::Flat;
    }

    fn step(
        &mut self,
        index: usize,
        candle: &Candle,
        window: Option<CrossWindow>,
        config: &BacktestConfig,
    ) {
        if self.position == Position::Flat && window.is_some_and(|w| w.fast_crossed_above()) {
            self.enter(index, candle);
        }

        // Exit checks also see the candle the position was opened on.
        let exit = match &self.position {
            Position::Long(open) => exit_for(open, candle, window, config)
                .map(|(price, reason)| (open.clone(), price, reason)),
            Position::Flat => None,
        };
        if let Some((open, price, reason)) = exit {
            self.close(open, index, candle, price, reason);
        }

        self.running_max = self.running_max.max(self.equity);
        self.running_min = self.running_min.min(self.equity);
        self.result.equity_curve.push(self.equity);
    }

    fn finish(mut self) -> BacktestResult {
        self.result.total_profit = self.equity - INITIAL_EQUITY;
        self.result.max_drawdown = self.running_max - self.running_min;
        if let Position::Long(open) = self.position {
            self.result.open_position = Some(open);
        }
        self.result
    }
}

/// First exit that applies on this candle: stop, then target, then crossover.
fn exit_for(
    open: &OpenPosition,
    candle: &Candle,
    window: Option<CrossWindow>,
    config: &BacktestConfig,
) -> Option<(f64, ExitReason)> {
    let stop = config.stop_price(open.entry_price);
    let target = config.target_price(open.entry_price);

    if candle.low <= stop {
        Some((stop, ExitReason::StopLoss))
    } else if candle.high >= target {
        Some((target, ExitReason::TakeProfit))
    } else if window.is_some_and(|w| w.fast_crossed_below()) {
        Some((candle.close, ExitReason::Crossover))
    } else {
        None
    }
}

/// Walk the candles from index 1, trading `fast` (EMA) crossing `slow` (SMA).
///
/// Series shorter than `candles` are treated as undefined past their end.
pub fn run_backtest(
    candles: &[Candle],
    slow: &IndicatorSeries,
    fast: &IndicatorSeries,
    config: &BacktestConfig,
) -> BacktestResult {
    let mut state = SimState::new();

    for (index, candle) in candles.iter().enumerate().skip(1) {
        state.step(index, candle, CrossWindow::at(slow, fast, index), config);
    }

    let result = state.finish();
    debug!(
        candles = candles.len(),
        trades = result.total_trades,
        wins = result.wins,
        losses = result.losses,
        profit = result.total_profit,
        "backtest complete"
    );
    result
}
