//! Composite scorer.
//!
//! Combines canonical per-source scores into one weighted 0–100 composite
//! and an aggregate buzz count.

use std::collections::BTreeMap;

use sentiment_trade_core::{CanonicalSignal, ConfigError, SourceStatus, WeightProfile};

/// Weighted combination of canonical signals.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    /// Weighted score in [0, 100]
    pub score: f64,
    /// Sum of sample counts over configured sources
    pub total_buzz: u64,
    /// Canonical reading per configured source, defaults filled in
    pub per_source: BTreeMap<String, CanonicalSignal>,
}

/// Combines canonical signals under a fixed [`WeightProfile`].
///
/// Every configured source contributes: a source that reported nothing is
/// scored at the fallback value with zero samples. Weights are never
/// renormalized over the sources that happened to report.
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    weights: WeightProfile,
    fallback_score: f64,
}

impl CompositeScorer {
    /// Creates a scorer.
    ///
    /// `fallback_score` is used for configured sources missing from the input,
    /// normally the normalizer's unavailable default.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the weights are invalid or the fallback lies
    /// outside [0, 100].
    pub fn new(weights: WeightProfile, fallback_score: f64) -> Result<Self, ConfigError> {
        weights.validate()?;
        if !fallback_score.is_finite() || !(0.0..=100.0).contains(&fallback_score) {
            return Err(ConfigError::OutOfRange {
                field: "fallback_score",
                value: fallback_score,
            });
        }
        Ok(Self {
            weights,
            fallback_score,
        })
    }

    #[must_use]
    pub fn weights(&self) -> &WeightProfile {
        &self.weights
    }

    /// Scores a set of canonical signals.
    ///
    /// Signals from unconfigured sources are ignored. If a source appears
    /// more than once, the last occurrence wins.
    #[must_use]
    pub fn score(&self, signals: &[CanonicalSignal]) -> Composite {
        let reported: BTreeMap<&str, &CanonicalSignal> = signals
            .iter()
            .map(|s| (s.source_id.as_str(), s))
            .collect();

        for ignored in reported.keys().filter(|id| !self.weights.contains(id)) {
            tracing::debug!(source = %ignored, "Ignoring signal from unconfigured source");
        }

        let mut score = 0.0;
        let mut total_buzz = 0u64;
        let mut per_source = BTreeMap::new();

        for (source_id, weight) in self.weights.iter() {
            let canonical = reported.get(source_id).map_or_else(
                || self.fallback(source_id),
                |s| CanonicalSignal::clone(s),
            );

            score += weight * canonical.score.clamp(0.0, 100.0);
            total_buzz = total_buzz.saturating_add(canonical.sample_count);
            per_source.insert(source_id.to_string(), canonical);
        }

        Composite {
            score: score.clamp(0.0, 100.0),
            total_buzz,
            per_source,
        }
    }

    fn fallback(&self, source_id: &str) -> CanonicalSignal {
        CanonicalSignal {
            source_id: source_id.to_string(),
            score: self.fallback_score,
            sample_count: 0,
            status: SourceStatus::Unavailable,
            bullish_count: None,
            bearish_count: None,
            attributes: BTreeMap::new(),
        }
    }
}
