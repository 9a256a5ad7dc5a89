use std::sync::Arc;

use async_trait::async_trait;
use sentiment_trade_core::{attribute_keys, source_ids, RawSignal, SignalSource, SourceScale};

use crate::collector::{AnalystSnapshot, RatingFeed};

/// Score for an unknown or missing recommendation
const UNRATED_SCORE: f64 = 50.0;

/// Maps a recommendation key onto a 0..100 score.
#[must_use]
pub fn recommendation_score(recommendation: &str) -> f64 {
    let table: &[(&str, f64)] = &[
        ("strong_buy", 95.0),
        ("buy", 80.0),
        ("outperform", 80.0),
        ("hold", 50.0),
        ("underperform", 20.0),
        ("sell", 10.0),
        ("strong_sell", 5.0),
        ("none", UNRATED_SCORE),
    ];

    let key = recommendation.trim().to_lowercase().replace([' ', '-'], "_");
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(UNRATED_SCORE, |&(_, score)| score)
}

/// Scores an analyst snapshot: recommendation grade plus an upside bonus,
/// capped at 100.
#[must_use]
pub fn analyst_score(snapshot: &AnalystSnapshot) -> f64 {
    let base = snapshot
        .recommendation
        .as_deref()
        .map_or(UNRATED_SCORE, recommendation_score);

    // Large gap to the mean target strengthens the grade
    let bonus = match snapshot.upside_pct() {
        Some(upside) if upside > 25.0 => 15.0,
        Some(upside) if upside > 15.0 => 10.0,
        _ => 0.0,
    };

    (base + bonus).min(100.0)
}

/// Consensus analyst recommendation.
///
/// Contributes no buzz: the analyst count is not a sample of market chatter.
pub struct AnalystRatingSource {
    feed: Arc<dyn RatingFeed>,
}

impl AnalystRatingSource {
    #[must_use]
    pub fn new(feed: Arc<dyn RatingFeed>) -> Self {
        Self { feed }
    }
}

#[async_trait]
impl SignalSource for AnalystRatingSource {
    fn source_id(&self) -> &str {
        source_ids::ANALYST
    }

    fn scale(&self) -> SourceScale {
        SourceScale::Percent
    }

    async fn query(&self, ticker: &str) -> RawSignal {
        match self.feed.rating(ticker).await {
            Ok(snapshot) => {
                tracing::debug!(
                    ticker = %ticker,
                    recommendation = ?snapshot.recommendation,
                    analysts = ?snapshot.analyst_count,
                    "Analyst consensus"
                );
                let mut raw = RawSignal::percent(self.source_id(), analyst_score(&snapshot), 0)
                    .with_attribute(
                        attribute_keys::RECOMMENDATION,
                        snapshot.recommendation.as_deref().unwrap_or("none"),
                    );
                if let Some(upside) = snapshot.upside_pct() {
                    raw = raw
                        .with_attribute(attribute_keys::TARGET_UPSIDE_PCT, format!("{upside:.2}"));
                }
                if let Some(count) = snapshot.analyst_count {
                    raw = raw.with_attribute(attribute_keys::ANALYST_COUNT, count);
                }
                raw
            }
            Err(e) => RawSignal::unavailable(self.source_id(), self.scale(), e.to_string()),
        }
    }
}
