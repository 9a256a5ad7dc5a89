//! Typed errors for configuration and backtest failures.

use chrono::NaiveDate;
use thiserror::Error;

/// Invalid configuration, detected before any evaluation runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Weight profile has no sources.
    #[error("no source weights configured")]
    EmptyWeights,

    /// A weight is negative or not a finite number.
    #[error("weight for source '{source_id}' must be finite and non-negative, got {weight}")]
    InvalidWeight { source_id: String, weight: f64 },

    /// Weights do not sum to one.
    #[error("source weights must sum to 1.0 (±{tolerance}), got {sum}")]
    WeightSum { sum: f64, tolerance: f64 },

    /// Thresholds are not ordered `sell < buy <= strong_buy`.
    #[error(
        "thresholds must satisfy 0 <= sell < buy <= strong_buy <= 100, \
         got sell={sell}, buy={buy}, strong_buy={strong_buy}"
    )]
    ThresholdOrder { sell: f64, buy: f64, strong_buy: f64 },

    /// A score-valued setting lies outside [0, 100].
    #[error("{field} must be within [0, 100], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    /// A count or amount that must be positive is zero or negative.
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

/// Failure of a single backtest invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BacktestError {
    /// Too few trading days in the requested range.
    #[error("insufficient price history: {available} trading days available, {required} required")]
    InsufficientData { required: usize, available: usize },

    /// Start date after end date.
    #[error("invalid backtest range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message_names_both_counts() {
        let err = BacktestError::InsufficientData {
            required: 20,
            available: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("10 trading days"));
        assert!(msg.contains("20 required"));
    }

    #[test]
    fn weight_sum_message_includes_sum() {
        let err = ConfigError::WeightSum {
            sum: 0.9,
            tolerance: 1e-6,
        };
        assert!(err.to_string().contains("0.9"));
    }
}
