//! Wiring of signal sources from command-line options.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use sentiment_trade_backtest::CsvPriceHistory;
use sentiment_trade_core::{source_ids, AppConfig, SignalSource};
use sentiment_trade_signals::{
    AnalystRatingSource, MentionVolumeSource, MomentumSource, NewsSource, SnapshotFeed,
    SocialSentimentSource, SourceRegistry, StockTwitsClient, TextKind,
};

/// Where each feed reads from.
#[derive(Debug, Clone, Default)]
pub struct FeedOptions {
    /// Directory of `{TICKER}.json` snapshots for every source except momentum
    pub snapshot_dir: Option<PathBuf>,
    /// Read the social stream live instead of from snapshots
    pub stocktwits: bool,
    /// Directory of `{TICKER}.csv` price files for momentum
    pub prices_dir: Option<PathBuf>,
    /// Evaluation date for momentum
    pub as_of: Option<NaiveDate>,
}

/// Builds a registry holding every weighted source that has a feed.
///
/// Weighted sources left without a feed score as unavailable.
///
/// # Errors
/// Returns an error if the live social client cannot be created.
pub fn build_registry(config: &AppConfig, options: &FeedOptions) -> Result<SourceRegistry> {
    let mut registry = SourceRegistry::from_config(&config.screening);
    let snapshot = options.snapshot_dir.as_ref().map(SnapshotFeed::new);

    let mut candidates: Vec<Arc<dyn SignalSource>> = Vec::new();

    if options.stocktwits {
        candidates.push(Arc::new(SocialSentimentSource::new(Arc::new(
            StockTwitsClient::new()?,
        ))));
    } else if let Some(feed) = &snapshot {
        candidates.push(Arc::new(SocialSentimentSource::new(Arc::new(feed.clone()))));
    }

    if let Some(feed) = &snapshot {
        candidates.push(Arc::new(NewsSource::new(Arc::new(
            feed.clone().with_text(TextKind::Headlines),
        ))));
        candidates.push(Arc::new(NewsSource::finviz(Arc::new(
            feed.clone().with_text(TextKind::FinvizHeadlines),
        ))));
        candidates.push(Arc::new(MentionVolumeSource::new(Arc::new(
            feed.clone().with_text(TextKind::Posts),
        ))));
        candidates.push(Arc::new(AnalystRatingSource::new(Arc::new(feed.clone()))));
    }

    if let Some(dir) = &options.prices_dir {
        let mut momentum = MomentumSource::new(Arc::new(CsvPriceHistory::new(dir)));
        if let Some(date) = options.as_of {
            momentum = momentum.with_as_of(date);
        }
        candidates.push(Arc::new(momentum));
    }

    for source in candidates {
        if config.scoring.weights.contains(source.source_id()) {
            registry.register(source);
        } else {
            tracing::debug!(source = source.source_id(), "Source has no weight, not registered");
        }
    }

    let missing: Vec<&str> = config
        .scoring
        .weights
        .source_ids()
        .into_iter()
        .filter(|id| !registry.contains(id))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(
            "No feed for {}; they will score as unavailable",
            missing.join(", ")
        );
    }

    tracing::info!("Registered sources: {}", registry.ids().join(", "));
    Ok(registry)
}

/// Source ids in display and export order.
#[must_use]
pub fn column_order(config: &AppConfig) -> Vec<&str> {
    let known = [
        source_ids::SOCIAL,
        source_ids::ANALYST,
        source_ids::MOMENTUM,
        source_ids::NEWS,
        source_ids::FINVIZ,
        source_ids::MENTIONS,
    ];
    let mut ids: Vec<&str> = known
        .into_iter()
        .filter(|id| config.scoring.weights.contains(id))
        .collect();
    for id in config.scoring.weights.source_ids() {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiment_trade_core::WeightProfile;

    #[test]
    fn snapshot_feeds_cover_five_sources() {
        let config = AppConfig::default();
        let options = FeedOptions {
            snapshot_dir: Some(PathBuf::from("snapshots")),
            ..FeedOptions::default()
        };

        let registry = build_registry(&config, &options).unwrap();

        assert_eq!(
            registry.ids(),
            vec!["analyst", "finviz", "mentions", "news", "social"]
        );
    }

    #[test]
    fn prices_dir_adds_momentum() {
        let config = AppConfig::default();
        let options = FeedOptions {
            prices_dir: Some(PathBuf::from("prices")),
            ..FeedOptions::default()
        };

        let registry = build_registry(&config, &options).unwrap();

        assert_eq!(registry.ids(), vec!["momentum"]);
    }

    #[test]
    fn unweighted_sources_are_skipped() {
        let mut config = AppConfig::default();
        config.scoring.weights = WeightProfile::new([("news", 0.5), ("social", 0.5)]).unwrap();
        let options = FeedOptions {
            snapshot_dir: Some(PathBuf::from("snapshots")),
            prices_dir: Some(PathBuf::from("prices")),
            ..FeedOptions::default()
        };

        let registry = build_registry(&config, &options).unwrap();

        assert_eq!(registry.ids(), vec!["news", "social"]);
        assert_eq!(column_order(&config), vec!["social", "news"]);
    }

    #[test]
    fn default_column_order_matches_table() {
        let config = AppConfig::default();
        assert_eq!(
            column_order(&config),
            vec!["social", "analyst", "momentum", "news", "finviz", "mentions"]
        );
    }
}
