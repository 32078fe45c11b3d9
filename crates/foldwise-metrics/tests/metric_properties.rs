//! Range and invariance properties of the fold metrics.

use foldwise_metrics::{
    area_under_roc, normalized_pofb, Label, Metrics, RankingMode, ScoredPrediction,
};
use proptest::prelude::*;

fn prediction() -> impl Strategy<Value = ScoredPrediction> {
    // Probabilities on a 0.001 grid so ties actually occur.
    (0u32..=1000, any::<bool>(), 0.0f64..500.0).prop_map(|(k, pos, effort)| {
        let label = if pos { Label::Positive } else { Label::Negative };
        ScoredPrediction::new(f64::from(k) / 1000.0, label).with_effort(effort)
    })
}

proptest! {
    #[test]
    fn metrics_stay_in_range(preds in prop::collection::vec(prediction(), 1..60)) {
        for mode in [RankingMode::EffortWeighted, RankingMode::InstanceCount] {
            let m = Metrics::from_predictions(&preds, mode).unwrap();
            prop_assert!(m.is_finite());
            prop_assert!((0.0..=100.0).contains(&m.accuracy));
            prop_assert!((0.0..=1.0).contains(&m.precision));
            prop_assert!((0.0..=1.0).contains(&m.recall));
            prop_assert!((0.0..=1.0).contains(&m.auc));
            prop_assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(&m.kappa));
            // At most every positive found: (1 / 0.2) is the ceiling.
            prop_assert!((0.0..=5.0 + 1e-9).contains(&m.npofb20));
        }
    }

    #[test]
    fn auc_is_symmetric_under_probability_flip(preds in prop::collection::vec(prediction(), 2..60)) {
        let has_both = preds.iter().any(|p| p.actual.is_positive())
            && preds.iter().any(|p| !p.actual.is_positive());
        prop_assume!(has_both);
        let flipped: Vec<_> = preds
            .iter()
            .map(|p| ScoredPrediction { probability: 1.0 - p.probability, ..*p })
            .collect();
        let sum = area_under_roc(&preds) + area_under_roc(&flipped);
        prop_assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn full_budget_finds_every_positive(preds in prop::collection::vec(prediction(), 1..60)) {
        let positives = preds.iter().filter(|p| p.actual.is_positive()).count();
        let v = normalized_pofb(&preds, RankingMode::InstanceCount, 100.0).unwrap();
        let expected = if positives == 0 { 0.0 } else { 1.0 };
        prop_assert!((v - expected).abs() < 1e-9);
    }
}
