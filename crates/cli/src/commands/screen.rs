//! screen CLI command: ranks a watchlist by composite sentiment.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use sentiment_trade_core::MetricsFormatter;
use sentiment_trade_signals::{export::export_screening, universe, Screener, SentimentPipeline};

use super::ConfigSource;
use super::sources::{build_registry, column_order, FeedOptions};

/// Arguments for the screen command.
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("watchlist").required(true).args(["tickers", "universe"])))]
pub struct ScreenArgs {
    /// Comma-separated ticker symbols (e.g., "NVDA,AMD,TSLA")
    #[arg(long, value_delimiter = ',')]
    pub tickers: Vec<String>,

    /// Curated watchlist: popular, all, or a category such as semiconductors
    #[arg(long)]
    pub universe: Option<String>,

    /// Directory of per-ticker JSON snapshots
    #[arg(long, env = "SENTIMENT_SNAPSHOT_DIR")]
    pub snapshot_dir: Option<PathBuf>,

    /// Read social sentiment live from StockTwits
    #[arg(long)]
    pub stocktwits: bool,

    /// Directory of per-ticker price CSVs for momentum
    #[arg(long)]
    pub prices: Option<PathBuf>,

    /// Write the ranked results to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Rows to show (overrides the configured top_n)
    #[arg(long)]
    pub top: Option<usize>,
}

/// Runs the screen command.
///
/// # Errors
/// Returns an error if the configuration is invalid, a feed cannot be
/// created, or the output file cannot be written.
pub async fn run_screen(args: ScreenArgs, config_source: ConfigSource<'_>) -> Result<()> {
    let config = super::load_config(config_source)?;

    let tickers = watchlist(&args)?;
    tracing::info!("Screening {} tickers", tickers.len());

    let options = FeedOptions {
        snapshot_dir: args.snapshot_dir.clone(),
        stocktwits: args.stocktwits,
        prices_dir: args.prices.clone(),
        as_of: None,
    };
    let registry = build_registry(&config, &options)?;
    let pipeline = SentimentPipeline::new(&config.scoring, registry)
        .context("Invalid scoring configuration")?;

    let screener = Screener::new(Arc::new(pipeline), config.screening.max_concurrent_tickers);
    let report = screener.screen(&tickers).await;

    let top_n = args.top.unwrap_or(config.screening.top_n);
    println!("{}", MetricsFormatter::format_screening(&report.ranked, top_n));

    if !report.failures.is_empty() {
        println!("Failed tickers:");
        for failure in &report.failures {
            println!("  {:<8} {}", failure.ticker, failure.error);
        }
    }

    if let Some(path) = &args.output {
        export_screening(path, &report.ranked, &column_order(&config))?;
        println!("Results written to {}", path.display());
    }

    Ok(())
}

fn watchlist(args: &ScreenArgs) -> Result<Vec<String>> {
    if let Some(name) = &args.universe {
        return universe::resolve(name);
    }

    let tickers: Vec<String> = args
        .tickers
        .iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();
    if tickers.is_empty() {
        anyhow::bail!("No tickers given");
    }
    Ok(tickers)
}
