//! Price and volume momentum source.
//!
//! Scores the trailing return over roughly one month of trading days and
//! adds a bonus when recent volume runs well above its baseline.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use sentiment_trade_core::{
    source_ids, PriceBar, PriceHistoryProvider, RawSignal, SignalSource, SourceScale,
};

/// Configuration for momentum scoring.
#[derive(Debug, Clone)]
pub struct MomentumConfig {
    /// Calendar days of history requested per query
    pub history_days: i64,
    /// The return is measured from this many bars before the end (inclusive)
    pub return_window: usize,
    /// Bars averaged for recent volume
    pub recent_volume_bars: usize,
    /// Bars averaged for baseline volume, from the start of the history
    pub baseline_volume_bars: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            history_days: 90,         // ~3 months
            return_window: 20,        // ~1 month of trading days
            recent_volume_bars: 10,   // last 2 weeks
            baseline_volume_bars: 40, // first 2 months
        }
    }
}

/// Percentage return from `bars[len - window]` to the last bar.
#[must_use]
pub fn trailing_return_pct(bars: &[PriceBar], window: usize) -> Option<f64> {
    if window == 0 || bars.len() < window {
        return None;
    }
    let current = bars.last()?.close.to_f64()?;
    let base = bars[bars.len() - window].close.to_f64()?;
    if base <= 0.0 {
        return None;
    }
    Some((current - base) / base * 100.0)
}

/// Percentage by which the recent average volume exceeds the baseline average.
///
/// Zero when the baseline has no volume.
#[must_use]
pub fn volume_surge_pct(bars: &[PriceBar], recent: usize, baseline: usize) -> f64 {
    let mean = |slice: &[PriceBar]| -> f64 {
        if slice.is_empty() {
            return 0.0;
        }
        let total: f64 = slice.iter().filter_map(|b| b.volume.to_f64()).sum();
        total / slice.len() as f64
    };

    let recent_avg = mean(&bars[bars.len().saturating_sub(recent)..]);
    let baseline_avg = mean(&bars[..baseline.min(bars.len())]);

    if baseline_avg > 0.0 {
        (recent_avg - baseline_avg) / baseline_avg * 100.0
    } else {
        0.0
    }
}

/// Scores momentum on 0..100, `None` when there are too few bars.
#[must_use]
pub fn momentum_score(bars: &[PriceBar], config: &MomentumConfig) -> Option<f64> {
    let momentum = trailing_return_pct(bars, config.return_window)?;
    let surge = volume_surge_pct(bars, config.recent_volume_bars, config.baseline_volume_bars);

    let mut score: f64 = 50.0;

    score += if momentum > 20.0 {
        25.0
    } else if momentum > 10.0 {
        15.0
    } else if momentum > 5.0 {
        5.0
    } else if momentum < -20.0 {
        -25.0
    } else if momentum < -10.0 {
        -15.0
    } else {
        0.0
    };

    score += if surge > 50.0 {
        10.0
    } else if surge > 25.0 {
        5.0
    } else {
        0.0
    };

    Some(score.clamp(0.0, 100.0))
}

/// Momentum over recent daily bars.
///
/// Contributes no buzz. Reports unavailable when the history is too short.
pub struct MomentumSource {
    prices: Arc<dyn PriceHistoryProvider>,
    config: MomentumConfig,
    as_of: Option<NaiveDate>,
}

impl MomentumSource {
    #[must_use]
    pub fn new(prices: Arc<dyn PriceHistoryProvider>) -> Self {
        Self {
            prices,
            config: MomentumConfig::default(),
            as_of: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: MomentumConfig) -> Self {
        self.config = config;
        self
    }

    /// Pins the evaluation date instead of using today.
    #[must_use]
    pub fn with_as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }
}

#[async_trait]
impl SignalSource for MomentumSource {
    fn source_id(&self) -> &str {
        source_ids::MOMENTUM
    }

    fn scale(&self) -> SourceScale {
        SourceScale::Percent
    }

    async fn query(&self, ticker: &str) -> RawSignal {
        let end = self.as_of.unwrap_or_else(|| Utc::now().date_naive());
        let start = end - Duration::days(self.config.history_days);

        let bars = match self.prices.history(ticker, start, end).await {
            Ok(bars) => bars,
            Err(e) => return RawSignal::unavailable(self.source_id(), self.scale(), e.to_string()),
        };

        match momentum_score(&bars, &self.config) {
            Some(score) => RawSignal::percent(self.source_id(), score, 0),
            None => RawSignal::unavailable(
                self.source_id(),
                self.scale(),
                format!(
                    "{} bars of history, need {}",
                    bars.len(),
                    self.config.return_window
                ),
            ),
        }
    }
}
