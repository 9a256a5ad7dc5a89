use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An open long position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub shares: u64,
    pub entry_price: Decimal,
    pub entry_date: NaiveDate,
}

impl Position {
    #[must_use]
    pub const fn new(shares: u64, entry_price: Decimal, entry_date: NaiveDate) -> Self {
        Self {
            shares,
            entry_price,
            entry_date,
        }
    }

    /// Market value of the position at `price`.
    #[must_use]
    pub fn market_value(&self, price: Decimal) -> Decimal {
        Decimal::from(self.shares) * price
    }

    /// Cost paid to open the position.
    #[must_use]
    pub fn cost_basis(&self) -> Decimal {
        Decimal::from(self.shares) * self.entry_price
    }
}

/// Position state of a single-position account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionState {
    #[default]
    Flat,
    Long(Position),
}

impl PositionState {
    #[must_use]
    pub const fn is_long(&self) -> bool {
        matches!(self, Self::Long(_))
    }

    #[must_use]
    pub const fn position(&self) -> Option<&Position> {
        match self {
            Self::Flat => None,
            Self::Long(position) => Some(position),
        }
    }

    /// Shares currently held (zero when flat).
    #[must_use]
    pub fn shares(&self) -> u64 {
        self.position().map_or(0, |p| p.shares)
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Closed on a SELL signal
    Signal,
    /// Closed at the end of the backtest window
    ForcedLiquidation,
}

/// A completed round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: Decimal,
    pub exit_date: NaiveDate,
    pub exit_price: Decimal,
    pub shares: u64,
    /// `(exit_price - entry_price) * shares`
    pub profit: Decimal,
    /// `(exit_price - entry_price) / entry_price * 100`
    pub profit_pct: Decimal,
    pub days_held: i64,
    pub exit_reason: ExitReason,
}

impl Trade {
    /// Closes `position` at `price` on `date`.
    #[must_use]
    pub fn close(position: &Position, price: Decimal, date: NaiveDate, reason: ExitReason) -> Self {
        let price_change = price - position.entry_price;
        let profit_pct = if position.entry_price.is_zero() {
            Decimal::ZERO
        } else {
            price_change / position.entry_price * Decimal::ONE_HUNDRED
        };

        Self {
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_date: date,
            exit_price: price,
            shares: position.shares,
            profit: price_change * Decimal::from(position.shares),
            profit_pct,
            days_held: (date - position.entry_date).num_days(),
            exit_reason: reason,
        }
    }

    #[must_use]
    pub fn is_win(&self) -> bool {
        self.profit > Decimal::ZERO
    }
}

/// Portfolio snapshot for one trading day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub price: Decimal,
    pub shares: u64,
    pub cash: Decimal,
    /// `cash + shares * price`
    pub total_value: Decimal,
}
