//! Signal source implementations.
//!
//! Each source reads from a feed and reports one [`RawSignal`] per query.
//! Feed failures become unavailable readings; no source returns an error.
//!
//! [`RawSignal`]: sentiment_trade_core::RawSignal

mod analyst;
mod mentions;
mod momentum;
mod news;
mod social;

pub use analyst::{analyst_score, recommendation_score, AnalystRatingSource};
pub use mentions::MentionVolumeSource;
pub use momentum::{
    momentum_score, trailing_return_pct, volume_surge_pct, MomentumConfig, MomentumSource,
};
pub use news::NewsSource;
pub use social::SocialSentimentSource;
