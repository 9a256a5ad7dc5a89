use std::sync::Arc;

use async_trait::async_trait;
use sentiment_trade_core::{source_ids, RawSignal, SignalSource, SourceScale};

use crate::collector::TextFeed;
use crate::keywords::{KeywordPair, HEADLINE_NEUTRAL};

/// Headlines scored per query
const DEFAULT_MAX_HEADLINES: usize = 20;

/// Headlines scored per query by the secondary headline source
const FINVIZ_MAX_HEADLINES: usize = 15;

/// Keyword polarity averaged over the most recent headlines.
///
/// Only the first `max_headlines` are scored, but every headline counts
/// toward buzz.
pub struct NewsSource {
    feed: Arc<dyn TextFeed>,
    id: String,
    keywords: KeywordPair,
    max_headlines: usize,
}

impl NewsSource {
    /// Primary news source with the full keyword lists.
    #[must_use]
    pub fn new(feed: Arc<dyn TextFeed>) -> Self {
        Self {
            feed,
            id: source_ids::NEWS.to_string(),
            keywords: KeywordPair::NEWS,
            max_headlines: DEFAULT_MAX_HEADLINES,
        }
    }

    /// Secondary headline source: shorter keyword lists, first 15 headlines.
    #[must_use]
    pub fn finviz(feed: Arc<dyn TextFeed>) -> Self {
        Self::new(feed)
            .with_source_id(source_ids::FINVIZ)
            .with_keywords(KeywordPair::FINVIZ)
            .with_max_headlines(FINVIZ_MAX_HEADLINES)
    }

    #[must_use]
    pub fn with_source_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: KeywordPair) -> Self {
        self.keywords = keywords;
        self
    }

    #[must_use]
    pub fn with_max_headlines(mut self, max: usize) -> Self {
        self.max_headlines = max;
        self
    }
}

#[async_trait]
impl SignalSource for NewsSource {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn scale(&self) -> SourceScale {
        SourceScale::Percent
    }

    async fn query(&self, ticker: &str) -> RawSignal {
        let headlines = match self.feed.texts(ticker).await {
            Ok(headlines) => headlines,
            Err(e) => return RawSignal::unavailable(self.source_id(), self.scale(), e.to_string()),
        };

        let scored = &headlines[..headlines.len().min(self.max_headlines)];
        let score = self.keywords.average_score(scored).unwrap_or(HEADLINE_NEUTRAL);

        RawSignal::percent(self.source_id(), score, headlines.len() as u64)
    }
}
