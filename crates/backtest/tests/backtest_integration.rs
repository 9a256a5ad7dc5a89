use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sentiment_trade_backtest::{
    export_trades, BacktestEngine, ConstantSignal, CsvPriceHistory, InMemoryPriceHistory,
    ScriptedSignals,
};
use sentiment_trade_core::{BacktestConfig, BacktestError, ExitReason, PriceBar, TradeSignal};
use std::fmt::Write as _;
use tempfile::TempDir;

fn day(d: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap() + Duration::days(d)
}

fn write_prices(dir: &TempDir, ticker: &str, closes: &[Decimal]) {
    let mut csv = String::from("date,close,volume\n");
    for (i, close) in closes.iter().enumerate() {
        writeln!(csv, "{},{},1000", day(i as i64), close).unwrap();
    }
    std::fs::write(dir.path().join(format!("{ticker}.csv")), csv).unwrap();
}

#[tokio::test]
async fn scripted_round_trip_from_csv_files() {
    let dir = TempDir::new().unwrap();
    let mut closes = vec![dec!(100); 25];
    closes[5] = dec!(110);
    write_prices(&dir, "NVDA", &closes);

    let script_path = dir.path().join("signals.csv");
    std::fs::write(
        &script_path,
        format!("date,signal\n{},BUY\n{},SELL\n", day(0), day(5)),
    )
    .unwrap();
    let mut schedule = ScriptedSignals::from_csv(&script_path).unwrap();

    let engine = BacktestEngine::new(BacktestConfig {
        initial_capital: dec!(100000),
        evaluation_interval_days: 1,
        min_trading_days: 20,
    })
    .unwrap();
    let provider = CsvPriceHistory::new(dir.path());

    let report = engine
        .run_with_provider(&provider, "NVDA", day(0), day(24), &mut schedule)
        .await
        .unwrap();

    assert_eq!(report.trades.len(), 1);
    assert_eq!(report.trades[0].profit, dec!(10000));
    assert_eq!(report.trades[0].exit_reason, ExitReason::Signal);
    assert_eq!(report.metrics.final_value, dec!(110000));
    assert_eq!(report.metrics.total_return_pct, dec!(10));
    assert_eq!(report.equity_curve.len(), 25);

    let trades_path = dir.path().join("trades.csv");
    export_trades(&trades_path, &report.trades).unwrap();
    assert_eq!(std::fs::read_to_string(trades_path).unwrap().lines().count(), 2);
}

#[tokio::test]
async fn constant_buy_is_force_liquidated() {
    let bars: Vec<PriceBar> = (0..30)
        .map(|d| {
            let close = if d == 29 { dec!(120) } else { dec!(100) };
            PriceBar::new(day(d), close, dec!(0))
        })
        .collect();
    let provider = InMemoryPriceHistory::new().with_bars("AMD", bars);
    let engine = BacktestEngine::new(BacktestConfig {
        initial_capital: dec!(50000),
        ..BacktestConfig::default()
    })
    .unwrap();

    let report = engine
        .run_with_provider(
            &provider,
            "AMD",
            day(0),
            day(29),
            &mut ConstantSignal(TradeSignal::StrongBuy),
        )
        .await
        .unwrap();

    assert_eq!(report.trades.len(), 1);
    let trade = &report.trades[0];
    assert_eq!(trade.shares, 500);
    assert_eq!(trade.exit_price, dec!(120));
    assert_eq!(trade.profit, dec!(10000));
    assert_eq!(trade.exit_reason, ExitReason::ForcedLiquidation);
    // One evaluation per week over 30 days
    assert_eq!(report.metrics.evaluations, 5);
}

#[tokio::test]
async fn short_history_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_prices(&dir, "TSLA", &[dec!(200); 10]);
    let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
    let provider = CsvPriceHistory::new(dir.path());

    let err = engine
        .run_with_provider(
            &provider,
            "TSLA",
            day(0),
            day(40),
            &mut ConstantSignal(TradeSignal::Buy),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<BacktestError>(),
        Some(&BacktestError::InsufficientData {
            required: 20,
            available: 10
        })
    );
}

#[tokio::test]
async fn missing_price_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let engine = BacktestEngine::new(BacktestConfig::default()).unwrap();
    let provider = CsvPriceHistory::new(dir.path());

    let result = engine
        .run_with_provider(
            &provider,
            "MSFT",
            day(0),
            day(40),
            &mut ConstantSignal(TradeSignal::Hold),
        )
        .await;

    assert!(result.is_err());
}
