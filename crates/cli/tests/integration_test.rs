use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sentiment_trade_backtest::{BacktestEngine, ConstantSignal, InMemoryPriceHistory};
use sentiment_trade_core::{
    BacktestConfig, ExitReason, MetricsFormatter, PriceBar, ScoringConfig, TradeSignal,
};
use sentiment_trade_signals::export::write_screening;
use sentiment_trade_signals::{
    AnalystRatingSource, MentionVolumeSource, NewsSource, Screener, SentimentPipeline,
    SnapshotFeed, SocialSentimentSource, SourceRegistry, TextKind,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn write_snapshot(dir: &TempDir, ticker: &str, snapshot: &serde_json::Value) {
    std::fs::write(
        dir.path().join(format!("{ticker}.json")),
        serde_json::to_string_pretty(snapshot).unwrap(),
    )
    .unwrap();
}

fn social(bullish: usize, bearish: usize) -> serde_json::Value {
    let mut messages = Vec::new();
    for _ in 0..bullish {
        messages.push(json!({ "body": "loading up", "tag": "Bullish" }));
    }
    for _ in 0..bearish {
        messages.push(json!({ "body": "overvalued", "tag": "Bearish" }));
    }
    json!(messages)
}

fn snapshot_pipeline(dir: &TempDir) -> SentimentPipeline {
    let feed = SnapshotFeed::new(dir.path());
    let registry = SourceRegistry::default()
        .with_source(Arc::new(SocialSentimentSource::new(Arc::new(feed.clone()))))
        .with_source(Arc::new(NewsSource::new(Arc::new(
            feed.clone().with_text(TextKind::Headlines),
        ))))
        .with_source(Arc::new(NewsSource::finviz(Arc::new(
            feed.clone().with_text(TextKind::FinvizHeadlines),
        ))))
        .with_source(Arc::new(MentionVolumeSource::new(Arc::new(
            feed.clone().with_text(TextKind::Posts),
        ))))
        .with_source(Arc::new(AnalystRatingSource::new(Arc::new(feed))));

    SentimentPipeline::new(&ScoringConfig::default(), registry).unwrap()
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();

    write_snapshot(
        &dir,
        "NVDA",
        &json!({
            "social": social(14, 2),
            "headlines": [
                "Chipmaker shares surge on record growth",
                "Analysts upgrade after strong quarter",
                "Data center sales soar",
                "Stock hits record as rally continues",
            ],
            "finviz": [
                "Analysts upgrade NVDA",
                "Shares rally on AI demand",
                "Data center gain",
            ],
            "posts": [
                "NVDA calls to the moon",
                "going long into earnings",
                "yolo on NVDA",
                "bullish on AI demand",
            ],
            "analyst": {
                "recommendation": "strong_buy",
                "current_price": 100.0,
                "target_mean_price": 130.0,
                "analyst_count": 40
            }
        }),
    );

    write_snapshot(
        &dir,
        "TSLA",
        &json!({
            "social": social(2, 10),
            "headlines": [
                "Shares plunge after disappointing deliveries",
                "Margins decline again",
            ],
            "finviz": ["Downgrade weighs on shares"],
            "posts": ["puts before the crash", "short it"],
            "analyst": {
                "recommendation": "sell",
                "current_price": 100.0,
                "target_mean_price": 90.0
            }
        }),
    );

    dir
}

#[tokio::test]
async fn screening_ranks_snapshot_tickers() {
    let dir = fixture();
    let screener = Screener::new(Arc::new(snapshot_pipeline(&dir)), 2);

    let report = screener.screen(&["tsla", "AMD", "NVDA"]).await;

    assert!(report.failures.is_empty());
    let order: Vec<&str> = report.ranked.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(order, vec!["NVDA", "AMD", "TSLA"]);

    let nvda = &report.ranked[0];
    assert_eq!(nvda.signal, TradeSignal::StrongBuy);
    assert!(nvda.composite_score >= 75.0);
    // 16 social + 4 headlines + 3 finviz + 4 posts
    assert_eq!(nvda.total_buzz, 27);
    // Momentum has no feed and scores as unavailable
    assert_eq!(nvda.unavailable_sources(), vec!["momentum"]);

    let amd = &report.ranked[1];
    assert_eq!(amd.signal, TradeSignal::Hold);
    assert!((amd.composite_score - 50.0).abs() < 1e-9);
    assert_eq!(amd.total_buzz, 0);
    assert_eq!(amd.unavailable_sources().len(), 6);

    assert_eq!(report.ranked[2].signal, TradeSignal::Sell);
    assert_eq!(report.buys().count(), 1);

    let mut out = Vec::new();
    write_screening(
        &mut out,
        &report.ranked,
        &["social", "analyst", "momentum", "news", "finviz", "mentions"],
    )
    .unwrap();
    let csv = String::from_utf8(out).unwrap();
    assert_eq!(csv.lines().count(), 4);
    let nvda_row = csv.lines().nth(1).unwrap();
    assert!(nvda_row.starts_with("1,NVDA,"));
    assert!(nvda_row.ends_with(",75.00,100.00,strong_buy,30.00,40,14,2,"));

    let table = MetricsFormatter::format_screening(&report.ranked, 10);
    assert!(table.contains("TOP PICK: NVDA"));
    assert!(table.contains("strong_buy (upside: 30.0%)"));
    assert!(table.contains("14 bullish vs 2 bearish"));
}

#[tokio::test]
async fn live_composite_drives_backtest() {
    let dir = fixture();
    let pipeline = snapshot_pipeline(&dir);
    let result = pipeline.evaluate("NVDA").await;

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars: Vec<PriceBar> = (0..40)
        .map(|d| PriceBar::new(start + Duration::days(d), Decimal::from(100 + d), dec!(0)))
        .collect();
    let provider = InMemoryPriceHistory::new().with_bars("NVDA", bars);
    let engine = BacktestEngine::new(BacktestConfig {
        initial_capital: dec!(10000),
        ..BacktestConfig::default()
    })
    .unwrap();

    let report = engine
        .run_with_provider(
            &provider,
            "NVDA",
            start,
            start + Duration::days(39),
            &mut ConstantSignal::from_result(&result),
        )
        .await
        .unwrap();

    assert_eq!(report.trades.len(), 1);
    let trade = &report.trades[0];
    assert_eq!(trade.shares, 100);
    assert_eq!(trade.exit_price, dec!(139));
    assert_eq!(trade.exit_reason, ExitReason::ForcedLiquidation);
    assert_eq!(report.metrics.final_value, dec!(13900));
}
