//! Single-ticker evaluation: registry, normalizer, scorer, classifier.

use sentiment_trade_core::{CompositeResult, ConfigError, RawSignal, ScoringConfig};

use crate::classifier::SignalClassifier;
use crate::composite::CompositeScorer;
use crate::normalizer::Normalizer;
use crate::registry::SourceRegistry;

/// Produces a [`CompositeResult`] for one ticker.
pub struct SentimentPipeline {
    registry: SourceRegistry,
    normalizer: Normalizer,
    scorer: CompositeScorer,
    classifier: SignalClassifier,
}

impl SentimentPipeline {
    /// Builds a pipeline from scoring configuration.
    ///
    /// The normalizer's unavailable default also scores configured sources
    /// that are not registered at all.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if any part of `config` is invalid.
    pub fn new(config: &ScoringConfig, registry: SourceRegistry) -> Result<Self, ConfigError> {
        let normalizer = Normalizer::new(config.normalizer.clone())?;
        let scorer =
            CompositeScorer::new(config.weights.clone(), normalizer.unavailable_default())?;
        let classifier = SignalClassifier::new(config.thresholds.clone())?;

        for id in config.weights.source_ids() {
            if !registry.contains(id) {
                tracing::warn!(source = %id, "Weighted source has no registered implementation");
            }
        }

        Ok(Self {
            registry,
            normalizer,
            scorer,
            classifier,
        })
    }

    #[must_use]
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn classifier(&self) -> &SignalClassifier {
        &self.classifier
    }

    /// Queries every source for `ticker` and scores the readings.
    pub async fn evaluate(&self, ticker: &str) -> CompositeResult {
        let readings = self.registry.query_all(ticker).await;
        self.score_readings(ticker, &readings)
    }

    /// Scores readings that were gathered elsewhere.
    #[must_use]
    pub fn score_readings(&self, ticker: &str, readings: &[RawSignal]) -> CompositeResult {
        let canonical: Vec<_> = readings.iter().map(|r| self.normalizer.normalize(r)).collect();
        let composite = self.scorer.score(&canonical);
        let signal = self.classifier.classify_composite(&composite);

        tracing::debug!(
            ticker = %ticker,
            score = composite.score,
            buzz = composite.total_buzz,
            signal = %signal,
            "Composite evaluated"
        );

        CompositeResult {
            ticker: ticker.to_string(),
            composite_score: composite.score,
            total_buzz: composite.total_buzz,
            per_source: composite.per_source,
            signal,
        }
    }
}
