//! Day-by-day backtest of one ticker against a signal schedule.
//!
//! The engine walks the trading days in `[start, end]`, re-evaluates the
//! signal every `evaluation_interval_days` calendar days counted from
//! `start`, and applies it to a single-position account. A scheduled
//! evaluation that falls on a day without a bar runs on the next bar
//! instead. Any open position is liquidated at the last bar.
//!
//! # Example
//!
//! ```ignore
//! let engine = BacktestEngine::new(BacktestConfig::default())?;
//! let mut schedule = ScriptedSignals::from_csv("signals.csv")?;
//! let report = engine.run("NVDA", &bars, start, end, &mut schedule)?;
//! println!("{}", MetricsFormatter::format(&report.ticker, &report.metrics));
//! ```

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sentiment_trade_core::{
    slice_range, BacktestConfig, BacktestError, BacktestMetrics, ConfigError, EquityPoint,
    PriceBar, PriceHistoryProvider, Trade,
};

use crate::account::Account;
use crate::metrics::MetricsCalculator;
use crate::schedule::SignalSchedule;

/// Everything a completed backtest produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Closed round trips in exit order
    pub trades: Vec<Trade>,
    /// One point per trading day, after that day's transition
    pub equity_curve: Vec<EquityPoint>,
    pub metrics: BacktestMetrics,
}

pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    /// # Errors
    /// Returns [`ConfigError`] if the capital or cadence is not positive.
    pub fn new(config: BacktestConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Runs a backtest over the bars of `ticker` within `[start, end]`.
    ///
    /// `bars` may extend past the range; they are sliced and sorted first.
    ///
    /// # Errors
    ///
    /// - [`BacktestError::InvalidRange`] if `start > end`
    /// - [`BacktestError::InsufficientData`] if the range holds fewer than
    ///   `min_trading_days` bars; no account is created in that case
    pub fn run(
        &self,
        ticker: &str,
        bars: &[PriceBar],
        start: NaiveDate,
        end: NaiveDate,
        schedule: &mut dyn SignalSchedule,
    ) -> Result<BacktestReport, BacktestError> {
        if start > end {
            return Err(BacktestError::InvalidRange { start, end });
        }

        let bars = slice_range(bars, start, end);
        if bars.len() < self.config.min_trading_days {
            return Err(BacktestError::InsufficientData {
                required: self.config.min_trading_days,
                available: bars.len(),
            });
        }

        info!(
            "Backtesting {} from {} to {} over {} trading days",
            ticker,
            start,
            end,
            bars.len()
        );

        let interval = i64::from(self.config.evaluation_interval_days);
        let mut account = Account::new(self.config.initial_capital);
        let mut metrics = MetricsCalculator::new(self.config.initial_capital);
        let mut equity_curve = Vec::with_capacity(bars.len());
        let mut next_due = start;

        for bar in &bars {
            metrics.add_day();

            if bar.date >= next_due {
                let signal = schedule.signal_on(bar.date, bar);
                metrics.add_evaluation();
                debug!(ticker, date = %bar.date, %signal, close = %bar.close, "Evaluated signal");

                let was_long = account.state().is_long();
                let closed = account.apply(signal, bar.close, bar.date).cloned();
                if let Some(trade) = closed {
                    info!(
                        "SELL {} x{} @ {} on {} (profit {}, {:.2}%)",
                        ticker,
                        trade.shares,
                        trade.exit_price,
                        trade.exit_date,
                        trade.profit,
                        trade.profit_pct
                    );
                } else if !was_long && account.state().is_long() {
                    info!(
                        "BUY {} x{} @ {} on {}",
                        ticker,
                        account.state().shares(),
                        bar.close,
                        bar.date
                    );
                }

                next_due = next_evaluation(start, bar.date, interval);
            }

            equity_curve.push(account.equity_point(bar.date, bar.close));
        }

        if let Some(last) = bars.last() {
            if let Some(trade) = account.liquidate(last.close, last.date) {
                info!(
                    "Liquidated {} x{} @ {} on {} (profit {})",
                    ticker, trade.shares, trade.exit_price, trade.exit_date, trade.profit
                );
                if let Some(point) = equity_curve.last_mut() {
                    *point = account.equity_point(last.date, last.close);
                }
            }
        }

        for trade in account.trades() {
            metrics.add_trade(trade);
        }
        let metrics = metrics.calculate(account.cash());

        info!(
            "Backtest {} complete: {} trades, return {:.2}%",
            ticker, metrics.trade_count, metrics.total_return_pct
        );

        Ok(BacktestReport {
            ticker: ticker.to_string(),
            start,
            end,
            trades: account.into_trades(),
            equity_curve,
            metrics,
        })
    }

    /// Fetches history from `provider` and runs the backtest on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is invalid, the provider fails, or the
    /// history is too short.
    pub async fn run_with_provider(
        &self,
        provider: &dyn PriceHistoryProvider,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        schedule: &mut (dyn SignalSchedule + Send),
    ) -> Result<BacktestReport> {
        if start > end {
            return Err(BacktestError::InvalidRange { start, end }.into());
        }

        let bars = provider
            .history(ticker, start, end)
            .await
            .with_context(|| format!("Failed to load price history for {ticker}"))?;

        Ok(self.run(ticker, &bars, start, end, schedule)?)
    }
}

/// First evaluation slot strictly after `date`, on the grid anchored at `start`.
fn next_evaluation(start: NaiveDate, date: NaiveDate, interval: i64) -> NaiveDate {
    let elapsed = (date - start).num_days();
    start + Duration::days((elapsed / interval + 1) * interval)
}
