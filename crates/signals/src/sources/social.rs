use std::sync::Arc;

use async_trait::async_trait;
use sentiment_trade_core::{source_ids, RawSignal, SignalSource, SourceScale};

use crate::collector::{MessageTag, SocialFeed};

/// Bullish/bearish tag counts from a social message stream.
///
/// Buzz is the number of messages, tagged or not.
pub struct SocialSentimentSource {
    feed: Arc<dyn SocialFeed>,
}

impl SocialSentimentSource {
    #[must_use]
    pub fn new(feed: Arc<dyn SocialFeed>) -> Self {
        Self { feed }
    }
}

#[async_trait]
impl SignalSource for SocialSentimentSource {
    fn source_id(&self) -> &str {
        source_ids::SOCIAL
    }

    fn scale(&self) -> SourceScale {
        SourceScale::BullBearCounts
    }

    async fn query(&self, ticker: &str) -> RawSignal {
        let messages = match self.feed.messages(ticker).await {
            Ok(messages) => messages,
            Err(e) => return RawSignal::unavailable(self.source_id(), self.scale(), e.to_string()),
        };

        let (bullish, bearish) = messages.iter().fold((0, 0), |(bull, bear), m| match m.tag {
            Some(MessageTag::Bullish) => (bull + 1, bear),
            Some(MessageTag::Bearish) => (bull, bear + 1),
            None => (bull, bear),
        });

        RawSignal::bull_bear(self.source_id(), bullish, bearish, messages.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::SocialMessage;
    use anyhow::{anyhow, Result};
    use sentiment_trade_core::SourceStatus;

    struct MockFeed(Option<Vec<SocialMessage>>);

    #[async_trait]
    impl SocialFeed for MockFeed {
        async fn messages(&self, _ticker: &str) -> Result<Vec<SocialMessage>> {
            self.0.clone().ok_or_else(|| anyhow!("stream down"))
        }
    }

    #[tokio::test]
    async fn counts_tags_and_all_messages() {
        let feed = MockFeed(Some(vec![
            SocialMessage::new("a", Some(MessageTag::Bullish)),
            SocialMessage::new("b", Some(MessageTag::Bullish)),
            SocialMessage::new("c", Some(MessageTag::Bearish)),
            SocialMessage::new("d", None),
        ]));
        let source = SocialSentimentSource::new(Arc::new(feed));

        let raw = source.query("NVDA").await;

        assert_eq!(raw.bullish_count, Some(2));
        assert_eq!(raw.bearish_count, Some(1));
        assert_eq!(raw.sample_count, 4);
        assert_eq!(raw.status, SourceStatus::Ok);
    }

    #[tokio::test]
    async fn feed_error_is_unavailable() {
        let source = SocialSentimentSource::new(Arc::new(MockFeed(None)));

        let raw = source.query("NVDA").await;

        assert_eq!(raw.status, SourceStatus::Unavailable);
        assert_eq!(raw.detail.as_deref(), Some("stream down"));
    }
}
