pub mod classifier;
pub mod collector;
pub mod composite;
pub mod export;
pub mod keywords;
pub mod normalizer;
pub mod pipeline;
pub mod registry;
pub mod screener;
pub mod sources;
pub mod universe;

pub use classifier::SignalClassifier;
pub use composite::{Composite, CompositeScorer};
pub use normalizer::{bull_bear_score, Normalizer};
pub use pipeline::SentimentPipeline;
pub use registry::SourceRegistry;
pub use screener::{rank, validate_ticker, Screener, ScreeningReport, TickerFailure};

// Re-export feeds and sources for convenience
pub use collector::{
    AnalystSnapshot, MessageTag, RatingFeed, SnapshotFeed, SocialFeed, SocialMessage,
    StockTwitsClient, TextFeed, TextKind, TickerSnapshot,
};
pub use sources::{
    AnalystRatingSource, MentionVolumeSource, MomentumConfig, MomentumSource, NewsSource,
    SocialSentimentSource,
};
