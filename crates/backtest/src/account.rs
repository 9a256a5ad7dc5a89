//! Single-position account and its transition reducer.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sentiment_trade_core::{EquityPoint, ExitReason, Position, PositionState, Trade, TradeSignal};

/// Cash plus position state: everything a transition reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub cash: Decimal,
    pub state: PositionState,
}

impl Book {
    #[must_use]
    pub const fn new(cash: Decimal) -> Self {
        Self {
            cash,
            state: PositionState::Flat,
        }
    }

    /// `cash + shares * price`
    #[must_use]
    pub fn total_value(&self, price: Decimal) -> Decimal {
        self.cash + Decimal::from(self.state.shares()) * price
    }
}

/// Whole shares affordable with `cash` at `price`.
#[must_use]
pub fn affordable_shares(cash: Decimal, price: Decimal) -> u64 {
    if price <= Decimal::ZERO || cash <= Decimal::ZERO {
        return 0;
    }
    (cash / price).floor().to_u64().unwrap_or(0)
}

/// Applies one evaluated signal to a book.
///
/// | State | Signal          | Effect                                  |
/// |-------|-----------------|-----------------------------------------|
/// | Flat  | BUY/STRONG_BUY  | buy all affordable shares (if any)      |
/// | Flat  | HOLD/SELL       | none                                    |
/// | Long  | SELL            | sell everything, emit a [`Trade`]       |
/// | Long  | BUY/STRONG/HOLD | none; positions are never averaged into |
#[must_use]
pub fn transition(
    book: Book,
    signal: TradeSignal,
    price: Decimal,
    date: NaiveDate,
) -> (Book, Option<Trade>) {
    match (book.state, signal) {
        (PositionState::Flat, s) if s.is_buy() => {
            let shares = affordable_shares(book.cash, price);
            if shares == 0 {
                return (
                    Book {
                        cash: book.cash,
                        state: PositionState::Flat,
                    },
                    None,
                );
            }
            let position = Position::new(shares, price, date);
            let cash = book.cash - position.cost_basis();
            (
                Book {
                    cash,
                    state: PositionState::Long(position),
                },
                None,
            )
        }
        (PositionState::Long(position), TradeSignal::Sell) => {
            close(book.cash, &position, price, date, ExitReason::Signal)
        }
        (state, _) => (
            Book {
                cash: book.cash,
                state,
            },
            None,
        ),
    }
}

/// Closes any open position at `price` regardless of signal.
#[must_use]
pub fn liquidate(book: Book, price: Decimal, date: NaiveDate) -> (Book, Option<Trade>) {
    match book.state {
        PositionState::Long(position) => {
            close(book.cash, &position, price, date, ExitReason::ForcedLiquidation)
        }
        PositionState::Flat => (Book::new(book.cash), None),
    }
}

fn close(
    cash: Decimal,
    position: &Position,
    price: Decimal,
    date: NaiveDate,
    reason: ExitReason,
) -> (Book, Option<Trade>) {
    let trade = Trade::close(position, price, date, reason);
    let book = Book {
        cash: cash + position.market_value(price),
        state: PositionState::Flat,
    };
    (book, Some(trade))
}

/// Book plus the append-only trade log.
#[derive(Debug, Clone)]
pub struct Account {
    initial_capital: Decimal,
    book: Book,
    trades: Vec<Trade>,
}

impl Account {
    #[must_use]
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            book: Book::new(initial_capital),
            trades: Vec::new(),
        }
    }

    /// Applies a signal, returning the trade it closed, if any.
    pub fn apply(
        &mut self,
        signal: TradeSignal,
        price: Decimal,
        date: NaiveDate,
    ) -> Option<&Trade> {
        let book = std::mem::replace(&mut self.book, Book::new(Decimal::ZERO));
        let (book, trade) = transition(book, signal, price, date);
        self.commit(book, trade)
    }

    /// Force-closes any open position.
    pub fn liquidate(&mut self, price: Decimal, date: NaiveDate) -> Option<&Trade> {
        let book = std::mem::replace(&mut self.book, Book::new(Decimal::ZERO));
        let (book, trade) = liquidate(book, price, date);
        self.commit(book, trade)
    }

    fn commit(&mut self, book: Book, trade: Option<Trade>) -> Option<&Trade> {
        debug_assert!(book.cash >= Decimal::ZERO);
        self.book = book;
        match trade {
            Some(trade) => {
                self.trades.push(trade);
                self.trades.last()
            }
            None => None,
        }
    }

    #[must_use]
    pub fn equity_point(&self, date: NaiveDate, price: Decimal) -> EquityPoint {
        EquityPoint {
            date,
            price,
            shares: self.book.state.shares(),
            cash: self.book.cash,
            total_value: self.book.total_value(price),
        }
    }

    #[must_use]
    pub fn initial_capital(&self) -> Decimal {
        self.initial_capital
    }

    #[must_use]
    pub fn cash(&self) -> Decimal {
        self.book.cash
    }

    #[must_use]
    pub fn state(&self) -> &PositionState {
        &self.book.state
    }

    #[must_use]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    #[must_use]
    pub fn into_trades(self) -> Vec<Trade> {
        self.trades
    }
}
