use std::sync::Arc;

use async_trait::async_trait;
use sentiment_trade_core::{source_ids, RawSignal, SignalSource, SourceScale};

use crate::collector::TextFeed;
use crate::keywords::tally_posts;

/// Posts classified per query
const DEFAULT_MAX_POSTS: usize = 20;

/// Forum mention volume with keyword polarity.
///
/// Scored as the bullish share of tagged posts, neutral when nothing is
/// tagged. Every returned post is a mention for buzz, but only the first
/// `max_posts` are classified.
pub struct MentionVolumeSource {
    feed: Arc<dyn TextFeed>,
    max_posts: usize,
}

impl MentionVolumeSource {
    #[must_use]
    pub fn new(feed: Arc<dyn TextFeed>) -> Self {
        Self {
            feed,
            max_posts: DEFAULT_MAX_POSTS,
        }
    }

    #[must_use]
    pub fn with_max_posts(mut self, max: usize) -> Self {
        self.max_posts = max;
        self
    }
}

#[async_trait]
impl SignalSource for MentionVolumeSource {
    fn source_id(&self) -> &str {
        source_ids::MENTIONS
    }

    fn scale(&self) -> SourceScale {
        SourceScale::BullBearCounts
    }

    async fn query(&self, ticker: &str) -> RawSignal {
        let posts = match self.feed.texts(ticker).await {
            Ok(posts) => posts,
            Err(e) => return RawSignal::unavailable(self.source_id(), self.scale(), e.to_string()),
        };

        let mentions = posts.len() as u64;
        let (bullish, bearish) = tally_posts(&posts[..posts.len().min(self.max_posts)]);

        RawSignal::bull_bear(self.source_id(), bullish, bearish, mentions)
    }
}
