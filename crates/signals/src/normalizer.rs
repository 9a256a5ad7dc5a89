//! Maps source-native readings onto the canonical 0–100 scale.

use std::collections::BTreeMap;

use sentiment_trade_core::{
    CanonicalSignal, ConfigError, NormalizerConfig, RawSignal, SourceScale, SourceStatus,
};

/// Converts [`RawSignal`]s into [`CanonicalSignal`]s.
///
/// Never fails: unavailable or malformed readings are replaced by the
/// configured unavailable default with a zero sample count.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// # Errors
    /// Returns [`ConfigError`] if either default lies outside [0, 100].
    pub fn new(config: NormalizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Score assigned to unavailable or unreported sources.
    #[must_use]
    pub fn unavailable_default(&self) -> f64 {
        self.config.unavailable_default
    }

    #[must_use]
    pub fn normalize(&self, raw: &RawSignal) -> CanonicalSignal {
        if raw.status == SourceStatus::Unavailable {
            return self.unavailable(raw);
        }

        let score = match raw.scale {
            SourceScale::BullBearCounts => {
                let bullish = raw.bullish_count.unwrap_or(0);
                let bearish = raw.bearish_count.unwrap_or(0);
                bull_bear_score(bullish, bearish).unwrap_or(self.config.neutral_default)
            }
            SourceScale::Percent => {
                if !raw.raw_score.is_finite() {
                    return self.unavailable(raw);
                }
                raw.raw_score.clamp(0.0, 100.0)
            }
            SourceScale::NetSentiment => {
                if !raw.raw_score.is_finite() {
                    return self.unavailable(raw);
                }
                (raw.raw_score.clamp(-1.0, 1.0) + 1.0) * 50.0
            }
        };

        CanonicalSignal {
            source_id: raw.source_id.clone(),
            score,
            sample_count: raw.sample_count,
            status: SourceStatus::Ok,
            bullish_count: raw.bullish_count,
            bearish_count: raw.bearish_count,
            attributes: raw.attributes.clone(),
        }
    }

    /// Canonical reading for a configured source that did not report at all.
    #[must_use]
    pub fn missing(&self, source_id: &str) -> CanonicalSignal {
        CanonicalSignal {
            source_id: source_id.to_string(),
            score: self.config.unavailable_default,
            sample_count: 0,
            status: SourceStatus::Unavailable,
            bullish_count: None,
            bearish_count: None,
            attributes: BTreeMap::new(),
        }
    }

    fn unavailable(&self, raw: &RawSignal) -> CanonicalSignal {
        self.missing(&raw.source_id)
    }
}

/// Bullish share of tagged samples as a percentage, `None` when nothing was tagged.
#[must_use]
pub fn bull_bear_score(bullish: u64, bearish: u64) -> Option<f64> {
    if bullish == 0 && bearish == 0 {
        return None;
    }
    let tagged = bullish as f64 + bearish as f64;
    Some(bullish as f64 / tagged * 100.0)
}
