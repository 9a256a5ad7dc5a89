//! Maps a composite score onto a discrete trading signal.

use sentiment_trade_core::{ConfigError, ThresholdProfile, TradeSignal};

use crate::composite::Composite;

/// Pure threshold classifier.
///
/// Holds no state beyond its [`ThresholdProfile`], so identical inputs always
/// yield the identical signal.
#[derive(Debug, Clone)]
pub struct SignalClassifier {
    thresholds: ThresholdProfile,
}

impl SignalClassifier {
    /// # Errors
    /// Returns [`ConfigError::ThresholdOrder`] unless `0 <= sell < buy <= strong_buy <= 100`.
    pub fn new(thresholds: ThresholdProfile) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    #[must_use]
    pub fn thresholds(&self) -> &ThresholdProfile {
        &self.thresholds
    }

    /// Classifies a composite score.
    ///
    /// STRONG_BUY additionally requires enough buzz and a bullish lean on the
    /// tie-break counts; a strong score that fails either test falls back to BUY.
    #[must_use]
    pub fn classify(
        &self,
        composite_score: f64,
        total_buzz: u64,
        tie_break: (u64, u64),
    ) -> TradeSignal {
        let t = &self.thresholds;
        let (bullish, bearish) = tie_break;

        if composite_score >= t.strong_buy
            && total_buzz >= t.min_buzz_for_strong_buy
            && bullish > bearish
        {
            TradeSignal::StrongBuy
        } else if composite_score >= t.buy {
            TradeSignal::Buy
        } else if composite_score <= t.sell {
            TradeSignal::Sell
        } else {
            TradeSignal::Hold
        }
    }

    /// Classifies a [`Composite`], reading the tie-break counts from the
    /// configured tie-break source. Absent counts count as 0/0.
    #[must_use]
    pub fn classify_composite(&self, composite: &Composite) -> TradeSignal {
        let tie_break = composite
            .per_source
            .get(&self.thresholds.tie_break_source)
            .map_or((0, 0), |s| s.counts());

        self.classify(composite.score, composite.total_buzz, tie_break)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiment_trade_core::{CanonicalSignal, SourceStatus};
    use std::collections::BTreeMap;

    fn classifier() -> SignalClassifier {
        SignalClassifier::new(ThresholdProfile::default()).unwrap()
    }

    // ============================================
    // Threshold Tests
    // ============================================

    #[test]
    fn strong_buy_requires_all_three_conditions() {
        let c = classifier();
        assert_eq!(c.classify(80.0, 20, (10, 2)), TradeSignal::StrongBuy);
        assert_eq!(c.classify(75.0, 15, (1, 0)), TradeSignal::StrongBuy);
    }

    #[test]
    fn strong_score_with_low_buzz_is_buy() {
        assert_eq!(classifier().classify(80.0, 14, (10, 2)), TradeSignal::Buy);
    }

    #[test]
    fn strong_score_without_bullish_lean_is_buy() {
        let c = classifier();
        assert_eq!(c.classify(80.0, 50, (5, 5)), TradeSignal::Buy);
        assert_eq!(c.classify(80.0, 50, (0, 0)), TradeSignal::Buy);
        assert_eq!(c.classify(80.0, 50, (2, 9)), TradeSignal::Buy);
    }

    #[test]
    fn buy_boundary_is_inclusive() {
        let c = classifier();
        assert_eq!(c.classify(65.0, 0, (0, 0)), TradeSignal::Buy);
        assert_eq!(c.classify(64.99, 0, (0, 0)), TradeSignal::Hold);
    }

    #[test]
    fn sell_boundary_is_inclusive() {
        let c = classifier();
        assert_eq!(c.classify(35.0, 100, (50, 0)), TradeSignal::Sell);
        assert_eq!(c.classify(35.01, 100, (50, 0)), TradeSignal::Hold);
        assert_eq!(c.classify(0.0, 0, (0, 0)), TradeSignal::Sell);
    }

    #[test]
    fn neutral_score_is_hold() {
        assert_eq!(classifier().classify(50.0, 0, (0, 0)), TradeSignal::Hold);
    }

    #[test]
    fn custom_thresholds() {
        let c = SignalClassifier::new(ThresholdProfile {
            strong_buy: 90.0,
            buy: 55.0,
            sell: 45.0,
            min_buzz_for_strong_buy: 0,
            tie_break_source: "news".to_string(),
        })
        .unwrap();

        assert_eq!(c.classify(60.0, 0, (0, 0)), TradeSignal::Buy);
        assert_eq!(c.classify(44.0, 0, (0, 0)), TradeSignal::Sell);
        assert_eq!(c.classify(95.0, 0, (1, 0)), TradeSignal::StrongBuy);
    }

    #[test]
    fn rejects_unordered_thresholds() {
        let result = SignalClassifier::new(ThresholdProfile {
            sell: 66.0,
            ..ThresholdProfile::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn classify_is_referentially_pure() {
        let c = classifier();
        let inputs = [(80.0, 20, (10, 2)), (50.0, 0, (0, 0)), (20.0, 3, (1, 1))];

        let first: Vec<_> = inputs.iter().map(|&(s, b, t)| c.classify(s, b, t)).collect();
        let reversed: Vec<_> = inputs
            .iter()
            .rev()
            .map(|&(s, b, t)| c.classify(s, b, t))
            .rev()
            .collect();

        assert_eq!(first, reversed);
    }

    // ============================================
    // Composite Tests
    // ============================================

    #[test]
    fn classify_composite_reads_tie_break_source() {
        let mut per_source = BTreeMap::new();
        per_source.insert(
            "social".to_string(),
            CanonicalSignal {
                source_id: "social".to_string(),
                score: 90.0,
                sample_count: 40,
                status: SourceStatus::Ok,
                bullish_count: Some(30),
                bearish_count: Some(10),
                attributes: BTreeMap::new(),
            },
        );
        let composite = Composite {
            score: 78.0,
            total_buzz: 40,
            per_source,
        };

        assert_eq!(classifier().classify_composite(&composite), TradeSignal::StrongBuy);
    }

    #[test]
    fn classify_composite_without_tie_break_source_is_not_strong() {
        let composite = Composite {
            score: 78.0,
            total_buzz: 40,
            per_source: BTreeMap::new(),
        };

        assert_eq!(classifier().classify_composite(&composite), TradeSignal::Buy);
    }
}
