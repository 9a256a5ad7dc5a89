use rust_decimal::Decimal;
use sentiment_trade_core::{BacktestMetrics, Trade};

pub struct MetricsCalculator {
    initial_capital: Decimal,
    profits: Vec<Decimal>,
    wins: usize,
    days: usize,
    evaluations: usize,
}

impl MetricsCalculator {
    /// Creates a new `MetricsCalculator` with the specified initial capital.
    #[must_use]
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            profits: Vec::new(),
            wins: 0,
            days: 0,
            evaluations: 0,
        }
    }

    /// Adds a closed trade to the performance tracking.
    pub fn add_trade(&mut self, trade: &Trade) {
        if trade.is_win() {
            self.wins += 1;
        }
        self.profits.push(trade.profit);
    }

    pub fn add_day(&mut self) {
        self.days += 1;
    }

    pub fn add_evaluation(&mut self) {
        self.evaluations += 1;
    }

    /// Calculates metrics for a run ending with `final_value` in cash.
    #[must_use]
    pub fn calculate(&self, final_value: Decimal) -> BacktestMetrics {
        let total_return_pct = if self.initial_capital.is_zero() {
            Decimal::ZERO
        } else {
            (final_value - self.initial_capital) / self.initial_capital * Decimal::ONE_HUNDRED
        };

        let trade_count = self.profits.len();

        #[allow(clippy::cast_precision_loss)]
        let win_rate = if trade_count > 0 {
            self.wins as f64 / trade_count as f64
        } else {
            0.0
        };

        let avg_profit = if trade_count > 0 {
            self.profits.iter().sum::<Decimal>() / Decimal::from(trade_count)
        } else {
            Decimal::ZERO
        };

        BacktestMetrics {
            initial_capital: self.initial_capital,
            final_value,
            total_return_pct,
            trade_count,
            win_rate,
            avg_profit,
            days_simulated: self.days,
            evaluations: self.evaluations,
        }
    }
}
