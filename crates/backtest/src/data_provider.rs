use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sentiment_trade_core::{slice_range, PriceBar, PriceHistoryProvider};

/// Reads daily bars from a CSV file.
///
/// The header must name `date` and `close` columns; `volume` is optional.
/// Column order is free and extra columns are ignored.
///
/// # Errors
///
/// Returns an error if:
/// - The CSV file cannot be opened
/// - A required column is missing
/// - Date parsing fails (expects `YYYY-MM-DD`)
/// - Decimal parsing fails for close or volume
pub fn load_price_csv(path: impl AsRef<Path>) -> Result<Vec<PriceBar>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open price file: {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    };
    let date_col = column("date").ok_or_else(|| anyhow!("{}: no 'date' column", path.display()))?;
    let close_col =
        column("close").ok_or_else(|| anyhow!("{}: no 'close' column", path.display()))?;
    let volume_col = column("volume");

    let mut bars = Vec::new();
    for result in reader.records() {
        let record = result?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let date = NaiveDate::parse_from_str(field(date_col), "%Y-%m-%d")
            .with_context(|| format!("{}: invalid date '{}'", path.display(), field(date_col)))?;
        let close = Decimal::from_str(field(close_col))
            .with_context(|| format!("{}: invalid close on {}", path.display(), date))?;
        let volume = match volume_col.map(field) {
            Some(v) if !v.is_empty() => Decimal::from_str(v)
                .with_context(|| format!("{}: invalid volume on {}", path.display(), date))?,
            _ => Decimal::ZERO,
        };

        bars.push(PriceBar::new(date, close, volume));
    }

    // Sort by date to ensure chronological order
    bars.sort_by_key(|b| b.date);

    Ok(bars)
}

/// Price history from a directory of `{TICKER}.csv` files.
#[derive(Debug, Clone)]
pub struct CsvPriceHistory {
    dir: PathBuf,
}

impl CsvPriceHistory {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker.to_uppercase()))
    }
}

#[async_trait]
impl PriceHistoryProvider for CsvPriceHistory {
    async fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let path = self.path_for(ticker);
        let bars = tokio::task::spawn_blocking(move || load_price_csv(path))
            .await
            .context("Price loader task failed")??;

        Ok(slice_range(&bars, start, end))
    }
}

/// Price history held in memory, keyed by upper-case ticker.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceHistory {
    bars: HashMap<String, Vec<PriceBar>>,
}

impl InMemoryPriceHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: &str, bars: Vec<PriceBar>) {
        self.bars.insert(ticker.to_uppercase(), bars);
    }

    /// Builder method to add a ticker's bars.
    #[must_use]
    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.insert(ticker, bars);
        self
    }
}

#[async_trait]
impl PriceHistoryProvider for InMemoryPriceHistory {
    async fn history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let bars = self
            .bars
            .get(&ticker.to_uppercase())
            .ok_or_else(|| anyhow!("No price history for {}", ticker))?;
        Ok(slice_range(bars, start, end))
    }
}
