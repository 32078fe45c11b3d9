//! Rank-based ROC area.

use crate::prediction::ScoredPrediction;

/// AUC assigned when a fold lacks positives or negatives.
pub const UNDEFINED_AUC: f64 = 0.5;

/// Area under the ROC curve for the positive class.
///
/// Uses the Mann–Whitney formulation: predictions are ranked by ascending
/// probability, tied probabilities share their average rank, and
/// `AUC = (R+ - P(P+1)/2) / (P·N)` where `R+` is the rank sum of positives.
pub fn area_under_roc(preds: &[ScoredPrediction]) -> f64 {
    let positives = preds.iter().filter(|p| p.actual.is_positive()).count();
    let negatives = preds.len() - positives;
    if positives == 0 || negatives == 0 {
        return UNDEFINED_AUC;
    }

    let mut order: Vec<usize> = (0..preds.len()).collect();
    order.sort_by(|&a, &b| preds[a].probability.total_cmp(&preds[b].probability));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let p = preds[order[start]].probability;
        let mut end = start + 1;
        while end < order.len() && preds[order[end]].probability == p {
            end += 1;
        }
        // 1-based ranks start+1..=end share their mean.
        let shared_rank = (start + 1 + end) as f64 / 2.0;
        let tied_positives = order[start..end]
            .iter()
            .filter(|&&i| preds[i].actual.is_positive())
            .count();
        positive_rank_sum += shared_rank * tied_positives as f64;
        start = end;
    }

    let p = positives as f64;
    let n = negatives as f64;
    (positive_rank_sum - p * (p + 1.0) / 2.0) / (p * n)
}
