use crate::error::ConfigError;
use crate::signal::source_ids;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub backtest: BacktestConfig,
    pub screening: ScreeningConfig,
}

impl AppConfig {
    /// Validates every section.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        self.backtest.validate()?;
        self.screening.validate()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: WeightProfile,
    pub thresholds: ThresholdProfile,
    pub normalizer: NormalizerConfig,
}

impl ScoringConfig {
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        self.thresholds.validate()?;
        self.normalizer.validate()
    }
}

/// Per-source weights for the composite score.
///
/// Weights are keyed by source id, must be non-negative, and must sum to one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WeightProfile {
    weights: BTreeMap<String, f64>,
}

impl WeightProfile {
    /// Creates a validated weight profile.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the weights are empty, negative, or do not sum to one.
    pub fn new<I, S>(weights: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let profile = Self {
            weights: weights.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// # Errors
    /// Returns [`ConfigError`] if the weights are empty, negative, or do not sum to one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weights.is_empty() {
            return Err(ConfigError::EmptyWeights);
        }

        for (source_id, &weight) in &self.weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    source_id: source_id.clone(),
                    weight,
                });
            }
        }

        let sum: f64 = self.weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        Ok(())
    }

    /// Returns the weight of a source, if configured.
    #[must_use]
    pub fn weight(&self, source_id: &str) -> Option<f64> {
        self.weights.get(source_id).copied()
    }

    /// Returns true if the source is configured.
    #[must_use]
    pub fn contains(&self, source_id: &str) -> bool {
        self.weights.contains_key(source_id)
    }

    /// Iterates over (source id, weight) in source id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Returns the configured source ids in order.
    #[must_use]
    pub fn source_ids(&self) -> Vec<&str> {
        self.weights.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self {
            weights: BTreeMap::from([
                (source_ids::SOCIAL.to_string(), 0.30),
                (source_ids::ANALYST.to_string(), 0.25),
                (source_ids::MOMENTUM.to_string(), 0.20),
                (source_ids::NEWS.to_string(), 0.15),
                (source_ids::FINVIZ.to_string(), 0.05),
                (source_ids::MENTIONS.to_string(), 0.05),
            ]),
        }
    }
}

/// Composite-score cut-offs for signal classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThresholdProfile {
    /// Minimum composite for STRONG_BUY
    pub strong_buy: f64,
    /// Minimum composite for BUY
    pub buy: f64,
    /// Maximum composite for SELL
    pub sell: f64,
    /// Minimum total buzz for STRONG_BUY
    pub min_buzz_for_strong_buy: u64,
    /// Source whose bullish/bearish counts must lean bullish for STRONG_BUY
    pub tie_break_source: String,
}

impl ThresholdProfile {
    /// # Errors
    /// Returns [`ConfigError::ThresholdOrder`] unless `0 <= sell < buy <= strong_buy <= 100`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.sell >= 0.0
            && self.sell < self.buy
            && self.buy <= self.strong_buy
            && self.strong_buy <= 100.0;

        if ordered {
            Ok(())
        } else {
            Err(ConfigError::ThresholdOrder {
                sell: self.sell,
                buy: self.buy,
                strong_buy: self.strong_buy,
            })
        }
    }
}

impl Default for ThresholdProfile {
    fn default() -> Self {
        Self {
            strong_buy: 75.0,
            buy: 65.0,
            sell: 35.0,
            min_buzz_for_strong_buy: 15,
            tie_break_source: source_ids::SOCIAL.to_string(),
        }
    }
}

/// Default scores used when a source cannot supply one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Score for a count-based source that reported zero tagged samples
    pub neutral_default: f64,
    /// Score for an unavailable or missing source, applied to every source alike
    pub unavailable_default: f64,
}

impl NormalizerConfig {
    /// # Errors
    /// Returns [`ConfigError::OutOfRange`] if either default lies outside [0, 100].
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_score_range("neutral_default", self.neutral_default)?;
        check_score_range("unavailable_default", self.unavailable_default)
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            neutral_default: 50.0,
            unavailable_default: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestConfig {
    pub initial_capital: Decimal,
    /// Calendar days between signal evaluations
    pub evaluation_interval_days: u32,
    /// Fewer trading days than this aborts the run
    pub min_trading_days: usize,
}

impl BacktestConfig {
    /// # Errors
    /// Returns [`ConfigError::NotPositive`] for a non-positive capital or zero cadence.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capital <= Decimal::ZERO {
            return Err(ConfigError::NotPositive {
                field: "initial_capital",
            });
        }
        if self.evaluation_interval_days == 0 {
            return Err(ConfigError::NotPositive {
                field: "evaluation_interval_days",
            });
        }
        Ok(())
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: Decimal::from(100_000),
            evaluation_interval_days: 7,
            min_trading_days: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreeningConfig {
    /// Tickers evaluated concurrently
    pub max_concurrent_tickers: usize,
    /// Per-query timeout for every source
    pub source_timeout_secs: u64,
    /// In-flight queries allowed per source
    pub source_concurrency: usize,
    /// Rows shown in the ranked table
    pub top_n: usize,
}

impl ScreeningConfig {
    #[must_use]
    pub const fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    /// # Errors
    /// Returns [`ConfigError::NotPositive`] for any zero limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_tickers == 0 {
            return Err(ConfigError::NotPositive {
                field: "max_concurrent_tickers",
            });
        }
        if self.source_timeout_secs == 0 {
            return Err(ConfigError::NotPositive {
                field: "source_timeout_secs",
            });
        }
        if self.source_concurrency == 0 {
            return Err(ConfigError::NotPositive {
                field: "source_concurrency",
            });
        }
        Ok(())
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tickers: 4,
            source_timeout_secs: 10,
            source_concurrency: 2,
            top_n: 10,
        }
    }
}

fn check_score_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================
    // WeightProfile Tests
    // ============================================

    #[test]
    fn default_weights_are_valid() {
        let weights = WeightProfile::default();
        assert!(weights.validate().is_ok());
        assert_eq!(weights.len(), 6);
        assert_eq!(weights.weight("social"), Some(0.30));
        assert_eq!(weights.weight("finviz"), Some(0.05));
        assert_eq!(weights.weight("mentions"), Some(0.05));
    }

    #[test]
    fn weights_must_sum_to_one() {
        let err = WeightProfile::new([("a", 0.5), ("b", 0.4)]).unwrap_err();
        assert!(matches!(err, ConfigError::WeightSum { .. }));
    }

    #[test]
    fn weights_reject_negative_entries() {
        let err = WeightProfile::new([("a", 1.2), ("b", -0.2)]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidWeight {
                source_id: "b".to_string(),
                weight: -0.2
            }
        );
    }

    #[test]
    fn weights_reject_nan() {
        let err = WeightProfile::new([("a", f64::NAN)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWeight { .. }));
    }

    #[test]
    fn weights_reject_empty_profile() {
        let err = WeightProfile::new(Vec::<(String, f64)>::new()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyWeights);
    }

    #[test]
    fn weights_tolerate_float_rounding() {
        let weights = WeightProfile::new([("a", 0.1), ("b", 0.2), ("c", 0.7)]);
        assert!(weights.is_ok());
    }

    #[test]
    fn weights_iterate_in_source_order() {
        let weights = WeightProfile::new([("zeta", 0.5), ("alpha", 0.5)]).unwrap();
        assert_eq!(weights.source_ids(), vec!["alpha", "zeta"]);
    }

    // ============================================
    // ThresholdProfile Tests
    // ============================================

    #[test]
    fn default_thresholds_are_valid() {
        assert!(ThresholdProfile::default().validate().is_ok());
    }

    #[test]
    fn thresholds_reject_sell_above_buy() {
        let thresholds = ThresholdProfile {
            sell: 70.0,
            ..ThresholdProfile::default()
        };
        assert!(matches!(
            thresholds.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn thresholds_allow_buy_equal_to_strong_buy() {
        let thresholds = ThresholdProfile {
            buy: 75.0,
            strong_buy: 75.0,
            ..ThresholdProfile::default()
        };
        assert!(thresholds.validate().is_ok());
    }

    #[test]
    fn thresholds_reject_buy_above_strong_buy() {
        let thresholds = ThresholdProfile {
            buy: 80.0,
            ..ThresholdProfile::default()
        };
        assert!(thresholds.validate().is_err());
    }

    // ============================================
    // Section Tests
    // ============================================

    #[test]
    fn normalizer_rejects_out_of_range_default() {
        let config = NormalizerConfig {
            unavailable_default: 120.0,
            ..NormalizerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "unavailable_default",
                value: 120.0
            })
        );
    }

    #[test]
    fn backtest_rejects_zero_cadence() {
        let config = BacktestConfig {
            evaluation_interval_days: 0,
            ..BacktestConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn screening_timeout_converts_to_duration() {
        let config = ScreeningConfig::default();
        assert_eq!(config.source_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn app_config_default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn app_config_deserializes_partial_toml_shape() {
        let json = r#"{
            "scoring": { "thresholds": { "buy": 60.0 } },
            "backtest": { "evaluation_interval_days": 3 }
        }"#;

        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert!((config.scoring.thresholds.buy - 60.0).abs() < f64::EPSILON);
        assert!((config.scoring.thresholds.strong_buy - 75.0).abs() < f64::EPSILON);
        assert_eq!(config.backtest.evaluation_interval_days, 3);
        assert_eq!(config.backtest.min_trading_days, 20);
        assert_eq!(config.scoring.weights, WeightProfile::default());
    }
}
