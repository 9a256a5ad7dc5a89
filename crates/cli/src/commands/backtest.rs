//! backtest CLI command: replays a signal against daily closes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use sentiment_trade_backtest::{
    export_equity, export_trades, BacktestEngine, ConstantSignal, CsvPriceHistory,
    ScriptedSignals, SignalSchedule,
};
use sentiment_trade_core::MetricsFormatter;
use sentiment_trade_signals::{validate_ticker, SentimentPipeline};

use super::ConfigSource;
use super::sources::{build_registry, FeedOptions};

/// Arguments for the backtest command.
#[derive(Args, Debug, Clone)]
pub struct BacktestArgs {
    /// Ticker symbol to backtest
    #[arg(long)]
    pub ticker: String,

    /// Directory of per-ticker price CSVs (date,close[,volume])
    #[arg(long)]
    pub prices: PathBuf,

    /// First day of the window (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day of the window (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Scripted signals CSV (date,signal); without it the live composite is used
    #[arg(long)]
    pub signals: Option<PathBuf>,

    /// Directory of per-ticker JSON snapshots for the live composite
    #[arg(long, env = "SENTIMENT_SNAPSHOT_DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Read social sentiment live from StockTwits for the live composite
    #[arg(long)]
    pub stocktwits: bool,

    /// Write the trade log to this CSV file
    #[arg(long)]
    pub trades_out: Option<PathBuf>,

    /// Write the equity curve to this CSV file
    #[arg(long)]
    pub equity_out: Option<PathBuf>,
}

/// Runs the backtest command.
///
/// # Errors
/// Returns an error if the configuration, price data or signal script is
/// invalid, or if the window holds too few trading days.
pub async fn run_backtest(args: BacktestArgs, config_source: ConfigSource<'_>) -> Result<()> {
    let config = super::load_config(config_source)?;
    let ticker = args.ticker.trim().to_uppercase();
    validate_ticker(&ticker)?;

    tracing::info!(
        "Running backtest for {} from {} to {}",
        ticker,
        args.start,
        args.end
    );

    let mut schedule: Box<dyn SignalSchedule + Send> = match &args.signals {
        Some(path) => {
            let script = ScriptedSignals::from_csv(path)?;
            tracing::info!("Loaded {} scripted signals from {}", script.len(), path.display());
            Box::new(script)
        }
        None => {
            let options = FeedOptions {
                snapshot_dir: args.snapshot_dir.clone(),
                stocktwits: args.stocktwits,
                prices_dir: Some(args.prices.clone()),
                as_of: Some(args.end),
            };
            let registry = build_registry(&config, &options)?;
            let pipeline = SentimentPipeline::new(&config.scoring, registry)
                .context("Invalid scoring configuration")?;
            let result = pipeline.evaluate(&ticker).await;
            tracing::info!(
                "Live composite for {}: {:.1} ({}), buzz {}",
                ticker,
                result.composite_score,
                result.signal,
                result.total_buzz
            );
            Box::new(ConstantSignal::from_result(&result))
        }
    };

    let engine = BacktestEngine::new(config.backtest.clone())
        .context("Invalid backtest configuration")?;
    let provider = CsvPriceHistory::new(&args.prices);
    let report = engine
        .run_with_provider(&provider, &ticker, args.start, args.end, schedule.as_mut())
        .await?;

    println!("{}", MetricsFormatter::format(&report.ticker, &report.metrics));
    if !report.trades.is_empty() {
        println!("{}", MetricsFormatter::format_trades(&report.trades));
    }

    if let Some(path) = &args.trades_out {
        export_trades(path, &report.trades)?;
        println!("Trades written to {}", path.display());
    }
    if let Some(path) = &args.equity_out {
        export_equity(path, &report.equity_curve)?;
        println!("Equity curve written to {}", path.display());
    }

    Ok(())
}
