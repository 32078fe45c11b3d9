//! 2×2 confusion matrix and the metrics derived from the 0.5 decision rule.

use crate::prediction::{Label, ScoredPrediction};

/// Probability at or above which an instance is predicted positive.
///
/// Equivalent to `round(p) == 1`. Accuracy, precision, recall, F1 and kappa
/// all go through this constant; AUC and NPofB ignore it.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Confusion counts for the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(preds: &[ScoredPrediction]) -> Self {
        let mut cm = Self::default();
        for p in preds {
            match (p.predicted(), p.actual) {
                (Label::Positive, Label::Positive) => cm.true_positives += 1,
                (Label::Positive, Label::Negative) => cm.false_positives += 1,
                (Label::Negative, Label::Negative) => cm.true_negatives += 1,
                (Label::Negative, Label::Positive) => cm.false_negatives += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// Percentage of correct decisions, in `[0, 100]`.
    pub fn accuracy(&self) -> f64 {
        let n = self.total();
        if n == 0 {
            return 0.0;
        }
        (self.true_positives + self.true_negatives) as f64 / n as f64 * 100.0
    }

    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// Cohen's kappa over the 2×2 matrix.
    pub fn kappa(&self) -> f64 {
        let n = self.total() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let observed = (self.true_positives + self.true_negatives) as f64 / n;

        let actual_pos = (self.true_positives + self.false_negatives) as f64;
        let actual_neg = (self.true_negatives + self.false_positives) as f64;
        let pred_pos = (self.true_positives + self.false_positives) as f64;
        let pred_neg = (self.true_negatives + self.false_negatives) as f64;
        let chance = (actual_pos * pred_pos + actual_neg * pred_neg) / (n * n);

        if chance >= 1.0 {
            // Both raters put everything in one class.
            return if observed >= 1.0 { 1.0 } else { 0.0 };
        }
        (observed - chance) / (1.0 - chance)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preds(pairs: &[(f64, Label)]) -> Vec<ScoredPrediction> {
        pairs
            .iter()
            .map(|&(p, l)| ScoredPrediction::new(p, l))
            .collect()
    }

    #[test]
    fn counts_follow_threshold() {
        let cm = ConfusionMatrix::from_predictions(&preds(&[
            (0.9, Label::Positive),
            (0.5, Label::Negative),
            (0.1, Label::Negative),
            (0.3, Label::Positive),
        ]));
        assert_eq!(cm.true_positives, 1);
        assert_eq!(cm.false_positives, 1);
        assert_eq!(cm.true_negatives, 1);
        assert_eq!(cm.false_negatives, 1);
        assert_eq!(cm.accuracy(), 50.0);
        assert_eq!(cm.precision(), 0.5);
        assert_eq!(cm.recall(), 0.5);
        assert_eq!(cm.f1(), 0.5);
    }

    #[test]
    fn kappa_textbook_example() {
        // tp=20 fn=5 fp=10 tn=15: po=0.7, pe=0.5 -> kappa=0.4
        let cm = ConfusionMatrix {
            true_positives: 20,
            false_negatives: 5,
            false_positives: 10,
            true_negatives: 15,
        };
        assert!((cm.kappa() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn kappa_degenerate_single_class() {
        let all_right = ConfusionMatrix {
            true_negatives: 4,
            ..Default::default()
        };
        assert_eq!(all_right.kappa(), 1.0);
        assert_eq!(ConfusionMatrix::default().kappa(), 0.0);
    }

    #[test]
    fn zero_denominators_are_zero() {
        let cm = ConfusionMatrix::from_predictions(&preds(&[(0.1, Label::Negative)]));
        assert_eq!(cm.precision(), 0.0);
        assert_eq!(cm.recall(), 0.0);
        assert_eq!(cm.f1(), 0.0);
        assert_eq!(ConfusionMatrix::default().accuracy(), 0.0);
    }
}
