//! StockTwits symbol stream client.
//!
//! The public stream endpoint needs no API key. Requests are paced with a
//! shared rate limiter.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

use super::types::{MessageTag, SocialFeed, SocialMessage};

/// StockTwits API base URL
const STOCKTWITS_API: &str = "https://api.stocktwits.com/api/2";

/// Default rate limit (requests per minute)
const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 60;

/// HTTP timeout for a single request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    messages: Option<Vec<StreamMessage>>,
}

#[derive(Debug, Deserialize)]
struct StreamMessage {
    #[serde(default)]
    body: String,
    #[serde(default)]
    entities: Option<Entities>,
}

#[derive(Debug, Deserialize)]
struct Entities {
    #[serde(default)]
    sentiment: Option<Sentiment>,
}

#[derive(Debug, Deserialize)]
struct Sentiment {
    #[serde(default)]
    basic: Option<String>,
}

impl StreamMessage {
    fn tag(&self) -> Option<MessageTag> {
        let basic = self.entities.as_ref()?.sentiment.as_ref()?.basic.as_deref()?;
        match basic {
            "Bullish" => Some(MessageTag::Bullish),
            "Bearish" => Some(MessageTag::Bearish),
            _ => None,
        }
    }
}

/// Social feed backed by the StockTwits symbol stream.
pub struct StockTwitsClient {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl StockTwitsClient {
    /// Creates a client against the public API.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(STOCKTWITS_API, DEFAULT_RATE_LIMIT_PER_MINUTE)
    }

    /// Creates a client with a custom base URL and rate limit.
    ///
    /// # Errors
    /// Returns an error if the rate limit is zero or the HTTP client cannot be built.
    pub fn with_config(base_url: &str, rate_limit_per_minute: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        let per_minute = NonZeroU32::new(rate_limit_per_minute)
            .ok_or_else(|| anyhow!("Rate limit must be > 0"))?;
        let rate_limiter = RateLimiter::direct(Quota::per_minute(per_minute));

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter,
        })
    }

    fn stream_url(&self, ticker: &str) -> String {
        format!(
            "{}/streams/symbol/{}.json",
            self.base_url,
            ticker.to_uppercase()
        )
    }
}

#[async_trait]
impl SocialFeed for StockTwitsClient {
    async fn messages(&self, ticker: &str) -> Result<Vec<SocialMessage>> {
        self.rate_limiter.until_ready().await;

        let url = self.stream_url(ticker);
        tracing::debug!("Fetching StockTwits stream from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow!("API error {}: {}", status, text));
        }

        let stream: StreamResponse = response.json().await?;
        let messages = stream
            .messages
            .ok_or_else(|| anyhow!("StockTwits response for {} has no messages", ticker))?;

        Ok(messages
            .into_iter()
            .map(|m| {
                let tag = m.tag();
                SocialMessage::new(m.body, tag)
            })
            .collect())
    }
}
