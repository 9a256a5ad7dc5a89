use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily closing price for one trading day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: Decimal,
    #[serde(default)]
    pub volume: Decimal,
}

impl PriceBar {
    #[must_use]
    pub const fn new(date: NaiveDate, close: Decimal, volume: Decimal) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }
}

/// Returns the bars within `[start, end]`, sorted ascending by date.
///
/// Bars with a non-positive close are dropped. When the input holds more
/// than one bar for a date, the last one wins.
#[must_use]
pub fn slice_range(bars: &[PriceBar], start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
    let mut sliced: Vec<PriceBar> = bars
        .iter()
        .filter(|b| b.date >= start && b.date <= end && b.close > Decimal::ZERO)
        .cloned()
        .collect();

    sliced.sort_by_key(|b| b.date);
    sliced.reverse();
    sliced.dedup_by_key(|b| b.date);
    sliced.reverse();
    sliced
}
