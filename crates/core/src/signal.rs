//! Sentiment signal types shared across the pipeline.
//!
//! A signal travels through three shapes:
//! - [`RawSignal`]: what a source reports, on the source's own scale
//! - [`CanonicalSignal`]: the same reading mapped onto the 0–100 scale
//! - [`CompositeResult`]: every canonical reading for a ticker, combined and classified

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Well-known source identifiers used by the default weight profile.
pub mod source_ids {
    /// Tagged social-media stream (bullish/bearish message counts).
    pub const SOCIAL: &str = "social";
    /// Keyword polarity over recent news headlines.
    pub const NEWS: &str = "news";
    /// Keyword polarity over a second, shorter headline list.
    pub const FINVIZ: &str = "finviz";
    /// Consensus analyst recommendation.
    pub const ANALYST: &str = "analyst";
    /// Price and volume momentum.
    pub const MOMENTUM: &str = "momentum";
    /// Forum mention volume with keyword polarity.
    pub const MENTIONS: &str = "mentions";
}

/// Keys of the descriptive attributes sources attach to their readings.
pub mod attribute_keys {
    /// Consensus recommendation label (e.g. "strong_buy").
    pub const RECOMMENDATION: &str = "recommendation";
    /// Mean price target over the current price, in percent.
    pub const TARGET_UPSIDE_PCT: &str = "target_upside_pct";
    /// Number of analysts behind the consensus.
    pub const ANALYST_COUNT: &str = "analyst_count";
}

/// Native scale a source reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceScale {
    /// Bullish and bearish counts; `raw_score` is ignored.
    BullBearCounts,
    /// Heuristic score already on 0..100.
    Percent,
    /// Net sentiment on -1..1.
    NetSentiment,
}

/// Whether a source produced a usable reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceStatus {
    Ok,
    Unavailable,
}

/// A reading as reported by one signal source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSignal {
    /// Identifier of the reporting source
    pub source_id: String,
    /// Scale `raw_score` is expressed on
    pub scale: SourceScale,
    /// Score on the source-native scale
    pub raw_score: f64,
    /// Number of samples (messages, headlines, posts) behind the score
    pub sample_count: u64,
    /// Bullish sample count, for sources that tag samples
    pub bullish_count: Option<u64>,
    /// Bearish sample count, for sources that tag samples
    pub bearish_count: Option<u64>,
    /// Availability of the reading
    pub status: SourceStatus,
    /// Reason the source was unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Descriptive values reported alongside the score, keyed by [`attribute_keys`]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl RawSignal {
    /// Creates a reading from bullish/bearish counts.
    #[must_use]
    pub fn bull_bear(
        source_id: impl Into<String>,
        bullish: u64,
        bearish: u64,
        sample_count: u64,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            scale: SourceScale::BullBearCounts,
            raw_score: 0.0,
            sample_count,
            bullish_count: Some(bullish),
            bearish_count: Some(bearish),
            status: SourceStatus::Ok,
            detail: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Creates a reading from a 0..100 heuristic score.
    #[must_use]
    pub fn percent(source_id: impl Into<String>, score: f64, sample_count: u64) -> Self {
        Self {
            source_id: source_id.into(),
            scale: SourceScale::Percent,
            raw_score: score,
            sample_count,
            bullish_count: None,
            bearish_count: None,
            status: SourceStatus::Ok,
            detail: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Creates a reading from a -1..1 net sentiment.
    #[must_use]
    pub fn net_sentiment(source_id: impl Into<String>, sentiment: f64, sample_count: u64) -> Self {
        Self {
            source_id: source_id.into(),
            scale: SourceScale::NetSentiment,
            raw_score: sentiment,
            sample_count,
            bullish_count: None,
            bearish_count: None,
            status: SourceStatus::Ok,
            detail: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Creates an unavailable reading.
    #[must_use]
    pub fn unavailable(
        source_id: impl Into<String>,
        scale: SourceScale,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            scale,
            raw_score: 0.0,
            sample_count: 0,
            bullish_count: None,
            bearish_count: None,
            status: SourceStatus::Unavailable,
            detail: Some(reason.into()),
            attributes: BTreeMap::new(),
        }
    }

    /// Attaches a descriptive attribute to a reading.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(key.into(), value.to_string());
        self
    }

    /// Returns true if the source produced a usable reading.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == SourceStatus::Ok
    }
}

/// A reading mapped onto the canonical 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSignal {
    pub source_id: String,
    /// Score in [0, 100]
    pub score: f64,
    pub sample_count: u64,
    pub status: SourceStatus,
    pub bullish_count: Option<u64>,
    pub bearish_count: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl CanonicalSignal {
    /// Returns the (bullish, bearish) counts, treating missing counts as zero.
    #[must_use]
    pub fn counts(&self) -> (u64, u64) {
        (
            self.bullish_count.unwrap_or(0),
            self.bearish_count.unwrap_or(0),
        )
    }
}

/// Discrete trading recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSignal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
}

impl TradeSignal {
    /// Returns true for signals that open a position from flat.
    #[must_use]
    pub const fn is_buy(self) -> bool {
        matches!(self, Self::StrongBuy | Self::Buy)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeSignal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "STRONG_BUY" => Ok(Self::StrongBuy),
            "BUY" => Ok(Self::Buy),
            "HOLD" => Ok(Self::Hold),
            "SELL" => Ok(Self::Sell),
            _ => anyhow::bail!(
                "Invalid signal: '{}'. Valid values: STRONG_BUY, BUY, HOLD, SELL",
                s
            ),
        }
    }
}

/// Combined and classified sentiment for one ticker at one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    pub ticker: String,
    /// Weighted composite in [0, 100]
    pub composite_score: f64,
    /// Sum of sample counts over configured sources
    pub total_buzz: u64,
    /// Canonical reading per configured source
    pub per_source: BTreeMap<String, CanonicalSignal>,
    pub signal: TradeSignal,
}

impl CompositeResult {
    /// Returns the canonical score of a source, if it was configured.
    #[must_use]
    pub fn source_score(&self, source_id: &str) -> Option<f64> {
        self.per_source.get(source_id).map(|s| s.score)
    }

    /// Returns the ids of sources that were unavailable for this evaluation.
    #[must_use]
    pub fn unavailable_sources(&self) -> Vec<&str> {
        self.per_source
            .values()
            .filter(|s| s.status == SourceStatus::Unavailable)
            .map(|s| s.source_id.as_str())
            .collect()
    }

    /// Returns an attribute reported by a source, if any.
    #[must_use]
    pub fn attribute(&self, source_id: &str, key: &str) -> Option<&str> {
        self.per_source
            .get(source_id)
            .and_then(|s| s.attributes.get(key))
            .map(String::as_str)
    }
}
