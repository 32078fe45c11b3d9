//! The per-fold metric record.

use crate::confusion::ConfusionMatrix;
use crate::error::MetricsResult;
use crate::prediction::ScoredPrediction;
use crate::ranking::{normalized_pofb, RankingMode, NPOFB_CUTOFF_PERCENT};
use crate::roc::area_under_roc;
use serde::{Deserialize, Serialize};

/// Fixed set of metrics reported for every fold and every aggregate.
///
/// `accuracy` is a percentage in `[0, 100]`; precision, recall, F1, kappa and
/// AUC are on their natural `[0, 1]` (kappa `[-1, 1]`) scales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub kappa: f64,
    pub auc: f64,
    /// Effort-aware ranking metric at a 20% budget.
    pub npofb20: f64,
}

impl Metrics {
    /// Column names in report order.
    pub const NAMES: [&'static str; 7] = [
        "Accuracy",
        "Precision",
        "Recall",
        "F1",
        "Kappa",
        "AUC",
        "NPofB20",
    ];

    pub fn from_predictions(preds: &[ScoredPrediction], mode: RankingMode) -> MetricsResult<Self> {
        let cm = ConfusionMatrix::from_predictions(preds);
        Ok(Self {
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            f1: cm.f1(),
            kappa: cm.kappa(),
            auc: area_under_roc(preds),
            npofb20: normalized_pofb(preds, mode, NPOFB_CUTOFF_PERCENT)?,
        })
    }

    pub fn values(&self) -> [f64; 7] {
        [
            self.accuracy,
            self.precision,
            self.recall,
            self.f1,
            self.kappa,
            self.auc,
            self.npofb20,
        ]
    }

    pub fn from_values(v: [f64; 7]) -> Self {
        Self {
            accuracy: v[0],
            precision: v[1],
            recall: v[2],
            f1: v[3],
            kappa: v[4],
            auc: v[5],
            npofb20: v[6],
        }
    }

    /// Apply `f` to every field.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_values(self.values().map(f))
    }

    /// Field-wise combination of two records.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let a = self.values();
        let b = other.values();
        Self::from_values(std::array::from_fn(|i| f(a[i], b[i])))
    }

    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|v| v.is_finite())
    }
}
