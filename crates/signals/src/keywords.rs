//! Keyword polarity heuristics for headlines and forum posts.
//!
//! Matching is case-insensitive substring matching, so "upgraded" counts as
//! "upgrade". Each keyword counts once per text.

/// Words that mark a headline as positive.
pub const NEWS_POSITIVE: &[&str] = &[
    "surge",
    "soar",
    "rally",
    "gain",
    "beat",
    "growth",
    "record",
    "strong",
    "bullish",
    "upgrade",
    "outperform",
    "buy",
    "positive",
    "breakthrough",
    "success",
];

/// Words that mark a headline as negative.
pub const NEWS_NEGATIVE: &[&str] = &[
    "drop",
    "fall",
    "plunge",
    "loss",
    "miss",
    "weak",
    "decline",
    "bearish",
    "downgrade",
    "concern",
    "warning",
    "sell",
    "negative",
    "disappointing",
    "trouble",
];

/// Shorter positive list for the secondary headline source.
pub const FINVIZ_POSITIVE: &[&str] = &["surge", "rally", "gain", "upgrade", "buy", "bullish"];

/// Shorter negative list for the secondary headline source.
pub const FINVIZ_NEGATIVE: &[&str] = &["drop", "fall", "downgrade", "sell", "bearish", "concern"];

/// Forum vocabulary for a long bias.
pub const FORUM_BULLISH: &[&str] = &["buy", "calls", "moon", "yolo", "bullish", "long"];

/// Forum vocabulary for a short bias.
pub const FORUM_BEARISH: &[&str] = &["sell", "puts", "bearish", "short", "crash"];

/// Headline score for a positive lean.
pub const HEADLINE_POSITIVE: f64 = 75.0;
/// Headline score for a negative lean.
pub const HEADLINE_NEGATIVE: f64 = 25.0;
/// Headline score for no lean.
pub const HEADLINE_NEUTRAL: f64 = 50.0;

/// Positive and negative word lists scored together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordPair {
    pub positive: &'static [&'static str],
    pub negative: &'static [&'static str],
}

impl KeywordPair {
    /// Lists used by the primary news source.
    pub const NEWS: Self = Self {
        positive: NEWS_POSITIVE,
        negative: NEWS_NEGATIVE,
    };

    /// Lists used by the secondary headline source.
    pub const FINVIZ: Self = Self {
        positive: FINVIZ_POSITIVE,
        negative: FINVIZ_NEGATIVE,
    };

    /// Scores one headline: 75 positive, 25 negative, 50 otherwise.
    #[must_use]
    pub fn headline_score(&self, headline: &str) -> f64 {
        match lean(headline, self.positive, self.negative) {
            Lean::Positive => HEADLINE_POSITIVE,
            Lean::Negative => HEADLINE_NEGATIVE,
            Lean::Neutral => HEADLINE_NEUTRAL,
        }
    }

    /// Mean headline score, `None` for no headlines.
    #[must_use]
    pub fn average_score<S: AsRef<str>>(&self, headlines: &[S]) -> Option<f64> {
        if headlines.is_empty() {
            return None;
        }
        let total: f64 = headlines.iter().map(|h| self.headline_score(h.as_ref())).sum();
        Some(total / headlines.len() as f64)
    }
}

/// Polarity of one text under a keyword pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lean {
    Positive,
    Negative,
    Neutral,
}

/// Counts how many of `keywords` appear in `text`.
#[must_use]
pub fn count_matches(text: &str, keywords: &[&str]) -> usize {
    let lower = text.to_lowercase();
    keywords.iter().filter(|kw| lower.contains(*kw)).count()
}

/// Classifies `text` by comparing positive and negative keyword hits.
#[must_use]
pub fn lean(text: &str, positive: &[&str], negative: &[&str]) -> Lean {
    let pos = count_matches(text, positive);
    let neg = count_matches(text, negative);

    match pos.cmp(&neg) {
        std::cmp::Ordering::Greater => Lean::Positive,
        std::cmp::Ordering::Less => Lean::Negative,
        std::cmp::Ordering::Equal => Lean::Neutral,
    }
}

/// Counts bullish and bearish forum posts.
///
/// Any bullish keyword marks a post bullish; otherwise any bearish keyword
/// marks it bearish.
#[must_use]
pub fn tally_posts<S: AsRef<str>>(posts: &[S]) -> (u64, u64) {
    posts.iter().fold((0, 0), |(bull, bear), post| {
        let text = post.as_ref();
        if count_matches(text, FORUM_BULLISH) > 0 {
            (bull + 1, bear)
        } else if count_matches(text, FORUM_BEARISH) > 0 {
            (bull, bear + 1)
        } else {
            (bull, bear)
        }
    })
}
