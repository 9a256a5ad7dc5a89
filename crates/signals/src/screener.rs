//! Screening across a ticker universe.
//!
//! Tickers are evaluated on a bounded number of concurrent tasks. Every
//! ticker yields its own result; results are merged and ranked only after
//! the whole batch completes.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures_util::stream::{self, StreamExt};
use sentiment_trade_core::CompositeResult;
use serde::Serialize;

use crate::pipeline::SentimentPipeline;

/// A ticker that could not be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerFailure {
    pub ticker: String,
    pub error: String,
}

/// Outcome of a screening batch.
#[derive(Debug, Clone, Default)]
pub struct ScreeningReport {
    /// Results ordered by descending composite score, then ticker
    pub ranked: Vec<CompositeResult>,
    pub failures: Vec<TickerFailure>,
}

impl ScreeningReport {
    /// Results with a BUY or STRONG_BUY signal, in rank order.
    pub fn buys(&self) -> impl Iterator<Item = &CompositeResult> {
        self.ranked.iter().filter(|r| r.signal.is_buy())
    }
}

/// Orders results by descending composite score, breaking ties by ticker.
pub fn rank(results: &mut [CompositeResult]) {
    results.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
}

/// Runs a [`SentimentPipeline`] over many tickers.
pub struct Screener {
    pipeline: Arc<SentimentPipeline>,
    max_concurrent: usize,
}

impl Screener {
    #[must_use]
    pub fn new(pipeline: Arc<SentimentPipeline>, max_concurrent: usize) -> Self {
        Self {
            pipeline,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Evaluates every ticker and ranks the results.
    ///
    /// A ticker that fails is logged and reported in
    /// [`ScreeningReport::failures`]; the rest of the batch continues.
    pub async fn screen<S: AsRef<str>>(&self, tickers: &[S]) -> ScreeningReport {
        tracing::info!(
            tickers = tickers.len(),
            concurrency = self.max_concurrent,
            "Screening started"
        );

        let outcomes: Vec<(String, Result<CompositeResult>)> = stream::iter(tickers)
            .map(|ticker| {
                let ticker = ticker.as_ref().trim().to_uppercase();
                let pipeline = Arc::clone(&self.pipeline);
                async move {
                    let result = evaluate_isolated(pipeline, &ticker).await;
                    (ticker, result)
                }
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut report = ScreeningReport::default();
        for (ticker, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    tracing::info!(
                        ticker = %ticker,
                        score = result.composite_score,
                        signal = %result.signal,
                        buzz = result.total_buzz,
                        "Ticker screened"
                    );
                    report.ranked.push(result);
                }
                Err(e) => {
                    tracing::warn!(ticker = %ticker, error = %e, "Ticker failed, skipping");
                    report.failures.push(TickerFailure {
                        ticker,
                        error: format!("{e:#}"),
                    });
                }
            }
        }

        rank(&mut report.ranked);
        report.failures.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        tracing::info!(
            screened = report.ranked.len(),
            failed = report.failures.len(),
            buys = report.buys().count(),
            "Screening finished"
        );

        report
    }
}

/// Validates a ticker symbol.
///
/// # Errors
/// Returns an error for empty symbols or symbols with characters other than
/// letters, digits, `.` and `-`.
pub fn validate_ticker(ticker: &str) -> Result<()> {
    if ticker.is_empty() {
        bail!("Empty ticker symbol");
    }
    if !ticker
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        bail!("Invalid ticker symbol: '{}'", ticker);
    }
    Ok(())
}

async fn evaluate_isolated(
    pipeline: Arc<SentimentPipeline>,
    ticker: &str,
) -> Result<CompositeResult> {
    validate_ticker(ticker)?;

    // A panicking source takes down only its own ticker
    let owned = ticker.to_string();
    tokio::spawn(async move { pipeline.evaluate(&owned).await })
        .await
        .with_context(|| format!("Evaluation of {ticker} aborted"))
}
