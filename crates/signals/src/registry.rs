//! Registry of signal sources keyed by source id.
//!
//! The registry queries every source for a ticker concurrently. Each source
//! gets its own concurrency cap and a per-query timeout; a timeout counts
//! as an unavailable reading, never as an error.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use sentiment_trade_core::{RawSignal, ScreeningConfig, SignalSource};
use tokio::sync::Semaphore;

struct RegisteredSource {
    source: Arc<dyn SignalSource>,
    permits: Arc<Semaphore>,
}

/// Registry for signal sources.
pub struct SourceRegistry {
    sources: HashMap<String, RegisteredSource>,
    timeout: Duration,
    concurrency: usize,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::from_config(&ScreeningConfig::default())
    }
}

impl SourceRegistry {
    /// Creates an empty registry.
    ///
    /// `concurrency` is clamped to at least one in-flight query per source.
    #[must_use]
    pub fn new(timeout: Duration, concurrency: usize) -> Self {
        Self {
            sources: HashMap::new(),
            timeout,
            concurrency: concurrency.max(1),
        }
    }

    /// Creates an empty registry with the limits from `config`.
    #[must_use]
    pub fn from_config(config: &ScreeningConfig) -> Self {
        Self::new(config.source_timeout(), config.source_concurrency)
    }

    /// Registers a source under its own id.
    ///
    /// If a source with the same id already exists, it will be replaced.
    pub fn register(&mut self, source: Arc<dyn SignalSource>) {
        let id = source.source_id().to_string();
        self.register_with_id(source, &id);
    }

    /// Registers a source under a custom id.
    pub fn register_with_id(&mut self, source: Arc<dyn SignalSource>, id: &str) {
        let entry = RegisteredSource {
            source,
            permits: Arc::new(Semaphore::new(self.concurrency)),
        };
        if self.sources.insert(id.to_string(), entry).is_some() {
            tracing::debug!(source = %id, "Replaced registered source");
        }
    }

    /// Builder method to register a source.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn SignalSource>) -> Self {
        self.register(source);
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<dyn SignalSource>> {
        self.sources.get(id).map(|r| &r.source)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    /// Returns the registered ids in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn remove(&mut self, id: &str) -> Option<Arc<dyn SignalSource>> {
        self.sources.remove(id).map(|r| r.source)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Queries every source for `ticker`.
    ///
    /// Returns one reading per registered source, ordered by id. Readings
    /// carry the id the source was registered under.
    pub async fn query_all(&self, ticker: &str) -> Vec<RawSignal> {
        let mut entries: Vec<(&String, &RegisteredSource)> = self.sources.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let queries = entries
            .into_iter()
            .map(|(id, entry)| self.query_one(id, entry, ticker));

        join_all(queries).await
    }

    async fn query_one(&self, id: &str, entry: &RegisteredSource, ticker: &str) -> RawSignal {
        let scale = entry.source.scale();

        let Ok(_permit) = entry.permits.acquire().await else {
            return RawSignal::unavailable(id, scale, "source closed");
        };

        let mut raw = match tokio::time::timeout(self.timeout, entry.source.query(ticker)).await {
            Ok(raw) => raw,
            Err(_) => RawSignal::unavailable(
                id,
                scale,
                format!("timed out after {:?}", self.timeout),
            ),
        };
        raw.source_id = id.to_string();

        if raw.is_available() {
            tracing::debug!(
                ticker = %ticker,
                source = %id,
                raw_score = raw.raw_score,
                samples = raw.sample_count,
                "Source reading"
            );
        } else {
            tracing::warn!(
                ticker = %ticker,
                source = %id,
                reason = raw.detail.as_deref().unwrap_or("unknown"),
                "Source unavailable"
            );
        }

        raw
    }
}
