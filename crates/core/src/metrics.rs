use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// End-of-run performance summary of a backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub initial_capital: Decimal,
    /// Cash after any forced liquidation
    pub final_value: Decimal,
    /// `(final_value - initial_capital) / initial_capital * 100`
    pub total_return_pct: Decimal,
    pub trade_count: usize,
    /// Fraction of trades with positive profit, 0.0 when there are no trades
    pub win_rate: f64,
    /// Mean trade profit, zero when there are no trades
    pub avg_profit: Decimal,
    /// Trading days simulated
    pub days_simulated: usize,
    /// Signal evaluations performed
    pub evaluations: usize,
}
