//! Signal supply for backtest evaluation days.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sentiment_trade_core::{CompositeResult, PriceBar, TradeSignal};

/// Supplies the signal evaluated on a given trading day.
///
/// Called only on evaluation days, in ascending date order.
pub trait SignalSchedule {
    fn signal_on(&mut self, date: NaiveDate, bar: &PriceBar) -> TradeSignal;
}

/// Fixed date-to-signal script. Dates without an entry yield HOLD.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedSignals {
    signals: BTreeMap<NaiveDate, TradeSignal>,
}

impl ScriptedSignals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to script a signal.
    #[must_use]
    pub fn with(mut self, date: NaiveDate, signal: TradeSignal) -> Self {
        self.signals.insert(date, signal);
        self
    }

    pub fn insert(&mut self, date: NaiveDate, signal: TradeSignal) {
        self.signals.insert(date, signal);
    }

    #[must_use]
    pub fn get(&self, date: NaiveDate) -> Option<TradeSignal> {
        self.signals.get(&date).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Loads a script from a CSV file with a `date,signal` header.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The CSV file cannot be opened
    /// - A row has fewer than two columns
    /// - A date is not `YYYY-MM-DD` or a signal is not recognized
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open signal script: {}", path.display()))?;

        let mut script = Self::new();
        for (line, result) in reader.records().enumerate() {
            let record = result?;
            let row = line + 2;
            let date_field = record
                .get(0)
                .with_context(|| format!("{}:{}: missing date", path.display(), row))?;
            let signal_field = record
                .get(1)
                .with_context(|| format!("{}:{}: missing signal", path.display(), row))?;

            let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d").with_context(|| {
                format!("{}:{}: invalid date '{}'", path.display(), row, date_field)
            })?;
            let signal: TradeSignal = signal_field
                .parse()
                .with_context(|| format!("{}:{}", path.display(), row))?;

            script.insert(date, signal);
        }

        Ok(script)
    }
}

impl SignalSchedule for ScriptedSignals {
    fn signal_on(&mut self, date: NaiveDate, _bar: &PriceBar) -> TradeSignal {
        self.get(date).unwrap_or(TradeSignal::Hold)
    }
}

/// The same signal on every evaluation day.
///
/// Replays one live composite evaluation across the whole window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantSignal(pub TradeSignal);

impl ConstantSignal {
    #[must_use]
    pub fn from_result(result: &CompositeResult) -> Self {
        Self(result.signal)
    }
}

impl SignalSchedule for ConstantSignal {
    fn signal_on(&mut self, _date: NaiveDate, _bar: &PriceBar) -> TradeSignal {
        self.0
    }
}

/// Signals computed by a closure.
pub struct FnSchedule<F>(pub F);

impl<F> SignalSchedule for FnSchedule<F>
where
    F: FnMut(NaiveDate, &PriceBar) -> TradeSignal,
{
    fn signal_on(&mut self, date: NaiveDate, bar: &PriceBar) -> TradeSignal {
        (self.0)(date, bar)
    }
}
