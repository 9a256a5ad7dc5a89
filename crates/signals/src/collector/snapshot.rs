//! File-backed feeds for offline screening and replay.
//!
//! Each ticker has one JSON document at `{dir}/{TICKER}.json`:
//!
//! ```json
//! {
//!   "social": [{ "body": "calls printing", "tag": "Bullish" }],
//!   "headlines": ["Chipmaker beats estimates"],
//!   "finviz": ["Analysts upgrade chipmaker"],
//!   "posts": ["YOLO NVDA calls"],
//!   "analyst": { "recommendation": "buy", "current_price": 100.0, "target_mean_price": 120.0 }
//! }
//! ```
//!
//! A section missing from the document makes the corresponding feed fail.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::types::{AnalystSnapshot, RatingFeed, SocialFeed, SocialMessage, TextFeed};

/// Which text section a [`SnapshotFeed`] serves as its [`TextFeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextKind {
    #[default]
    Headlines,
    /// Secondary headline list under the `finviz` key
    FinvizHeadlines,
    Posts,
}

/// Contents of one ticker snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    #[serde(default)]
    pub social: Option<Vec<SocialMessage>>,
    #[serde(default)]
    pub headlines: Option<Vec<String>>,
    #[serde(default)]
    pub finviz: Option<Vec<String>>,
    #[serde(default)]
    pub posts: Option<Vec<String>>,
    #[serde(default)]
    pub analyst: Option<AnalystSnapshot>,
}

/// Reads ticker snapshots from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct SnapshotFeed {
    dir: PathBuf,
    text: TextKind,
}

impl SnapshotFeed {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            text: TextKind::default(),
        }
    }

    /// Selects the section served through [`TextFeed`].
    #[must_use]
    pub fn with_text(mut self, text: TextKind) -> Self {
        self.text = text;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.json", ticker.to_uppercase()))
    }

    /// Loads and parses the snapshot for `ticker`.
    ///
    /// # Errors
    /// Returns an error if the file is missing or is not a valid snapshot.
    pub async fn load(&self, ticker: &str) -> Result<TickerSnapshot> {
        let path = self.path_for(ticker);
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
    }
}

#[async_trait]
impl SocialFeed for SnapshotFeed {
    async fn messages(&self, ticker: &str) -> Result<Vec<SocialMessage>> {
        self.load(ticker)
            .await?
            .social
            .ok_or_else(|| anyhow!("Snapshot for {} has no social section", ticker))
    }
}

#[async_trait]
impl TextFeed for SnapshotFeed {
    async fn texts(&self, ticker: &str) -> Result<Vec<String>> {
        let snapshot = self.load(ticker).await?;
        let (section, name) = match self.text {
            TextKind::Headlines => (snapshot.headlines, "headlines"),
            TextKind::FinvizHeadlines => (snapshot.finviz, "finviz"),
            TextKind::Posts => (snapshot.posts, "posts"),
        };
        section.ok_or_else(|| anyhow!("Snapshot for {} has no {} section", ticker, name))
    }
}

#[async_trait]
impl RatingFeed for SnapshotFeed {
    async fn rating(&self, ticker: &str) -> Result<AnalystSnapshot> {
        self.load(ticker)
            .await?
            .analyst
            .ok_or_else(|| anyhow!("Snapshot for {} has no analyst section", ticker))
    }
}
