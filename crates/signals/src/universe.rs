//! Curated ticker lists for screening without an explicit watchlist.
//!
//! Names resolve case-insensitively and ignore punctuation, so
//! `mega-cap-tech`, `Mega-Cap Tech` and `megacaptech` are the same category.

use anyhow::{bail, Result};

/// Category name and its tickers, focused on names with heavy social coverage.
pub const CATEGORIES: &[(&str, &[&str])] = &[
    ("Mega-Cap Tech", &["AAPL", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "TSLA"]),
    ("Meme Stocks", &["GME", "AMC", "BBBY", "PLTR", "BB"]),
    ("Crypto/Fintech", &["COIN", "MSTR", "SQ", "HOOD", "SOFI"]),
    ("Semiconductors", &["AMD", "INTC", "MU", "AVGO", "QCOM"]),
    ("AI/Cloud", &["SNOW", "CRWD", "NET", "DDOG", "AI", "SMCI"]),
    ("Popular Growth", &["SHOP", "ROKU", "UBER", "LYFT", "RIVN"]),
    ("Indices", &["SPY", "QQQ", "IWM"]),
];

/// Default watchlist: the 20 most discussed names across categories.
pub const POPULAR: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "TSLA", "AMD", "GME", "PLTR", "COIN", "SNOW", "CRWD", "META",
    "GOOGL", "AMZN", "SPY", "QQQ", "MSTR", "HOOD", "SOFI", "NET", "SMCI",
];

/// Universe name for [`POPULAR`].
pub const POPULAR_NAME: &str = "popular";
/// Universe name for every category combined.
pub const ALL_NAME: &str = "all";

fn slug(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Every ticker across all categories, first occurrence order, no duplicates.
#[must_use]
pub fn all_tickers() -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for ticker in CATEGORIES.iter().flat_map(|(_, tickers)| tickers.iter()) {
        if !tickers.iter().any(|t| t == ticker) {
            tickers.push((*ticker).to_string());
        }
    }
    tickers
}

/// Resolves `popular`, `all` or a category name to its tickers.
///
/// # Errors
/// Returns an error naming the valid universes if `name` matches none.
pub fn resolve(name: &str) -> Result<Vec<String>> {
    let wanted = slug(name);

    if wanted == POPULAR_NAME {
        return Ok(POPULAR.iter().map(ToString::to_string).collect());
    }
    if wanted == ALL_NAME {
        return Ok(all_tickers());
    }

    match CATEGORIES.iter().find(|(category, _)| slug(category) == wanted) {
        Some((_, tickers)) => Ok(tickers.iter().map(ToString::to_string).collect()),
        None => {
            let categories: Vec<&str> = CATEGORIES.iter().map(|(c, _)| *c).collect();
            bail!(
                "Unknown universe: '{}'. Valid values: {}, {}, {}",
                name,
                POPULAR_NAME,
                ALL_NAME,
                categories.join(", ")
            )
        }
    }
}
