use crate::price::PriceBar;
use crate::signal::{RawSignal, SourceScale};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// A provider of one kind of sentiment reading.
///
/// Implementations never fail: anything that goes wrong while gathering data
/// is reported as a [`RawSignal`] with `SourceStatus::Unavailable`.
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Identifier the source is registered and weighted under.
    fn source_id(&self) -> &str;

    /// Scale of the readings this source produces.
    fn scale(&self) -> SourceScale;

    /// Produces the current reading for `ticker`.
    async fn query(&self, ticker: &str) -> RawSignal;
}

/// Daily price history for a ticker.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Returns bars within `[start, end]`, ascending by date.
    ///
    /// Non-trading days are simply absent.
    ///
    /// # Errors
    /// Returns an error if the history cannot be read.
    async fn history(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<PriceBar>>;
}
