//! Feed interfaces the signal sources read from.
//!
//! Feeds return raw data and may fail; sources turn failures into
//! unavailable readings.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sentiment tag a poster attached to a social message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageTag {
    Bullish,
    Bearish,
}

/// One message from a social stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMessage {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tag: Option<MessageTag>,
}

impl SocialMessage {
    #[must_use]
    pub fn new(body: impl Into<String>, tag: Option<MessageTag>) -> Self {
        Self {
            body: body.into(),
            tag,
        }
    }
}

/// Consensus analyst view of a ticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalystSnapshot {
    /// Recommendation key such as `buy` or `strong_sell`
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub target_mean_price: Option<f64>,
    #[serde(default)]
    pub analyst_count: Option<u64>,
}

impl AnalystSnapshot {
    /// Percentage upside from the current price to the mean target.
    #[must_use]
    pub fn upside_pct(&self) -> Option<f64> {
        match (self.current_price, self.target_mean_price) {
            (Some(current), Some(target)) if current > 0.0 => {
                Some((target - current) / current * 100.0)
            }
            _ => None,
        }
    }
}

/// Stream of tagged social messages for a ticker.
#[async_trait]
pub trait SocialFeed: Send + Sync {
    /// # Errors
    /// Returns an error if the stream cannot be fetched.
    async fn messages(&self, ticker: &str) -> Result<Vec<SocialMessage>>;
}

/// Recent short texts about a ticker (headlines, post titles).
#[async_trait]
pub trait TextFeed: Send + Sync {
    /// # Errors
    /// Returns an error if the texts cannot be fetched.
    async fn texts(&self, ticker: &str) -> Result<Vec<String>>;
}

/// Analyst consensus for a ticker.
#[async_trait]
pub trait RatingFeed: Send + Sync {
    /// # Errors
    /// Returns an error if the snapshot cannot be fetched.
    async fn rating(&self, ticker: &str) -> Result<AnalystSnapshot>;
}
