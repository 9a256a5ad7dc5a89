#![allow(clippy::format_push_string)]
#![allow(clippy::uninlined_format_args)]

use crate::metrics::BacktestMetrics;
use crate::position::{ExitReason, Trade};
use crate::signal::{attribute_keys, source_ids, CompositeResult};

const SCREEN_RULE: &str =
    "════════════════════════════════════════════════════════════════════════════════\n";
const SCREEN_DIVIDER: &str =
    "────────────────────────────────────────────────────────────────────────────────\n";
const TRADE_DIVIDER: &str =
    "───────────────────────────────────────────────────────────────────────────────────────────\n";

pub struct MetricsFormatter;

impl MetricsFormatter {
    #[must_use]
    pub fn format(ticker: &str, metrics: &BacktestMetrics) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!("              BACKTEST RESULTS: {:<31}\n", ticker));
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("Portfolio Performance\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "Initial Capital:       ${:.2}\n",
            metrics.initial_capital
        ));
        output.push_str(&format!("Final Value:           ${:.2}\n", metrics.final_value));
        output.push_str(&format!(
            "Total Return:          {:.2}%\n",
            metrics.total_return_pct
        ));
        output.push_str(&format!(
            "Trading Days:          {}\n",
            metrics.days_simulated
        ));
        output.push_str(&format!("Evaluations:           {}\n", metrics.evaluations));
        output.push('\n');

        output.push_str("Trade Statistics\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("Total Trades:          {}\n", metrics.trade_count));

        if metrics.trade_count > 0 {
            output.push_str(&format!(
                "Win Rate:              {:.1}%\n",
                metrics.win_rate * 100.0
            ));
            output.push_str(&format!("Avg Profit:            ${:.2}\n", metrics.avg_profit));
        } else {
            output.push_str("Win Rate:              N/A (no trades)\n");
        }

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        if metrics.trade_count == 0 {
            output.push_str("\n⚠️  No trades were made during this backtest.\n");
            output.push_str("    Consider adjusting thresholds or the evaluation interval.\n\n");
        }

        output
    }

    #[must_use]
    pub fn format_trades(trades: &[Trade]) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{:<12}{:>10}  {:<12}{:>10}{:>8}{:>14}{:>9}{:>6}  {}\n",
            "Entry", "Price", "Exit", "Price", "Shares", "Profit", "Pct", "Days", "Exit"
        ));
        output.push_str(TRADE_DIVIDER);

        for trade in trades {
            let reason = match trade.exit_reason {
                ExitReason::Signal => "signal",
                ExitReason::ForcedLiquidation => "forced",
            };
            output.push_str(&format!(
                "{:<12}{:>10.2}  {:<12}{:>10.2}{:>8}{:>14.2}{:>8.1}%{:>6}  {}\n",
                trade.entry_date.to_string(),
                trade.entry_price,
                trade.exit_date.to_string(),
                trade.exit_price,
                trade.shares,
                trade.profit,
                trade.profit_pct,
                trade.days_held,
                reason
            ));
        }

        output
    }

    /// Formats the top `top_n` BUY/STRONG_BUY rows of a ranked screening result,
    /// followed by a summary of the best pick.
    #[must_use]
    pub fn format_screening(ranked: &[CompositeResult], top_n: usize) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(SCREEN_RULE);
        output.push_str(&format!("TOP {} OPPORTUNITIES\n", top_n));
        output.push_str(SCREEN_RULE);
        output.push_str(&format!(
            "{:<4}{:<8}{:<14}{:>7}  {:>8}{:>8}{:>8}{:>8}{:>7}{:>9}\n",
            "#", "Ticker", "Signal", "Score", "Social", "Analyst", "Mom", "News", "Buzz", "Upside"
        ));
        output.push_str(SCREEN_DIVIDER);

        let picks: Vec<&CompositeResult> =
            ranked.iter().filter(|r| r.signal.is_buy()).take(top_n).collect();

        for (idx, result) in picks.iter().enumerate() {
            let score = |id: &str| {
                result
                    .source_score(id)
                    .map_or_else(|| "-".to_string(), |s| format!("{:.1}", s))
            };
            output.push_str(&format!(
                "{:<4}{:<8}{:<14}{:>7.1}  {:>8}{:>8}{:>8}{:>8}{:>7}{:>9}\n",
                idx + 1,
                result.ticker,
                result.signal.as_str(),
                result.composite_score,
                score(source_ids::SOCIAL),
                score(source_ids::ANALYST),
                score(source_ids::MOMENTUM),
                score(source_ids::NEWS),
                result.total_buzz,
                upside(result).map_or_else(|| "-".to_string(), |u| format!("{:.1}%", u))
            ));
        }

        match picks.first() {
            Some(best) => output.push_str(&Self::format_top_pick(best)),
            None => output.push_str("No BUY or STRONG_BUY signals found.\n"),
        }

        output
    }

    fn format_top_pick(best: &CompositeResult) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(SCREEN_RULE);
        output.push_str(&format!("TOP PICK: {}\n", best.ticker));
        output.push_str(SCREEN_RULE);
        output.push_str(&format!("Signal:                {}\n", best.signal));
        output.push_str(&format!(
            "Composite Score:       {:.1}/100\n",
            best.composite_score
        ));

        let recommendation = best
            .attribute(source_ids::ANALYST, attribute_keys::RECOMMENDATION)
            .unwrap_or("n/a");
        match upside(best) {
            Some(upside) => output.push_str(&format!(
                "Analyst Rating:        {} (upside: {:.1}%)\n",
                recommendation, upside
            )),
            None => output.push_str(&format!("Analyst Rating:        {}\n", recommendation)),
        }

        if let Some(social) = best.per_source.get(source_ids::SOCIAL) {
            let (bullish, bearish) = social.counts();
            output.push_str(&format!(
                "Social:                {} bullish vs {} bearish\n",
                bullish, bearish
            ));
        }
        output.push_str(&format!("Total Buzz:            {} mentions\n", best.total_buzz));
        output.push_str(SCREEN_RULE);

        output
    }
}

fn upside(result: &CompositeResult) -> Option<f64> {
    result
        .attribute(source_ids::ANALYST, attribute_keys::TARGET_UPSIDE_PCT)
        .and_then(|u| u.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{CanonicalSignal, SourceStatus, TradeSignal};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use rust_decimal_macros::dec;

    fn metrics(trade_count: usize) -> BacktestMetrics {
        BacktestMetrics {
            initial_capital: dec!(100000),
            final_value: dec!(110000),
            total_return_pct: dec!(10),
            trade_count,
            win_rate: 1.0,
            avg_profit: dec!(10000),
            days_simulated: 30,
            evaluations: 5,
        }
    }

    #[test]
    fn format_includes_returns_and_win_rate() {
        let output = MetricsFormatter::format("NVDA", &metrics(1));

        assert!(output.contains("NVDA"));
        assert!(output.contains("Final Value:           $110000.00"));
        assert!(output.contains("Total Return:          10.00%"));
        assert!(output.contains("Win Rate:              100.0%"));
    }

    #[test]
    fn format_warns_when_no_trades() {
        let output = MetricsFormatter::format("NVDA", &metrics(0));

        assert!(output.contains("N/A (no trades)"));
        assert!(output.contains("No trades were made"));
    }

    #[test]
    fn format_trades_lists_each_trade() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let trades = vec![Trade {
            entry_date: day(1),
            entry_price: dec!(100),
            exit_date: day(6),
            exit_price: dec!(110),
            shares: 1000,
            profit: dec!(10000),
            profit_pct: dec!(10),
            days_held: 5,
            exit_reason: ExitReason::ForcedLiquidation,
        }];

        let output = MetricsFormatter::format_trades(&trades);

        assert!(output.contains("2024-01-01"));
        assert!(output.contains("2024-01-06"));
        assert!(output.contains("forced"));
    }

    #[test]
    fn format_screening_reports_empty_picks() {
        let output = MetricsFormatter::format_screening(&[], 10);
        assert!(output.contains("No BUY or STRONG_BUY signals found."));
        assert!(!output.contains("TOP PICK"));
    }

    fn screened(ticker: &str, score: f64, signal: TradeSignal) -> CompositeResult {
        let mut per_source = BTreeMap::new();
        per_source.insert(
            source_ids::SOCIAL.to_string(),
            CanonicalSignal {
                source_id: source_ids::SOCIAL.to_string(),
                score: 80.0,
                sample_count: 30,
                status: SourceStatus::Ok,
                bullish_count: Some(16),
                bearish_count: Some(4),
                attributes: BTreeMap::new(),
            },
        );
        per_source.insert(
            source_ids::ANALYST.to_string(),
            CanonicalSignal {
                source_id: source_ids::ANALYST.to_string(),
                score: 85.0,
                sample_count: 0,
                status: SourceStatus::Ok,
                bullish_count: None,
                bearish_count: None,
                attributes: BTreeMap::from([
                    (attribute_keys::RECOMMENDATION.to_string(), "strong_buy".to_string()),
                    (attribute_keys::TARGET_UPSIDE_PCT.to_string(), "27.50".to_string()),
                    (attribute_keys::ANALYST_COUNT.to_string(), "41".to_string()),
                ]),
            },
        );
        CompositeResult {
            ticker: ticker.to_string(),
            composite_score: score,
            total_buzz: 42,
            per_source,
            signal,
        }
    }

    #[test]
    fn format_screening_summarizes_best_buy() {
        let ranked = vec![
            screened("TSLA", 90.0, TradeSignal::Hold),
            screened("NVDA", 80.0, TradeSignal::StrongBuy),
            screened("AMD", 66.0, TradeSignal::Buy),
        ];

        let output = MetricsFormatter::format_screening(&ranked, 10);

        assert!(!output.contains("TSLA"));
        assert!(output.contains("27.5%"));
        assert!(output.contains("TOP PICK: NVDA"));
        assert!(output.contains("Composite Score:       80.0/100"));
        assert!(output.contains("Analyst Rating:        strong_buy (upside: 27.5%)"));
        assert!(output.contains("Social:                16 bullish vs 4 bearish"));
        assert!(output.contains("Total Buzz:            42 mentions"));
        assert!(!output.contains("TOP PICK: AMD"));
    }
}
