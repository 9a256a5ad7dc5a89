pub mod account;
pub mod data_provider;
pub mod engine;
pub mod export;
pub mod metrics;
pub mod schedule;

pub use account::{affordable_shares, liquidate, transition, Account, Book};
pub use data_provider::{load_price_csv, CsvPriceHistory, InMemoryPriceHistory};
pub use engine::{BacktestEngine, BacktestReport};
pub use export::{export_equity, export_trades, write_equity, write_trades};
pub use metrics::MetricsCalculator;
pub use schedule::{ConstantSignal, FnSchedule, ScriptedSignals, SignalSchedule};
