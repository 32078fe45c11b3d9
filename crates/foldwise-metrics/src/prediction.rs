use serde::{Deserialize, Serialize};

/// Binary class label. Every metric is defined relative to `Positive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Negative,
    Positive,
}

impl Label {
    pub fn is_positive(self) -> bool {
        matches!(self, Label::Positive)
    }

    /// Label chosen by the shared 0.5 decision rule.
    pub fn from_probability(p: f64) -> Self {
        if p >= crate::DECISION_THRESHOLD {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

/// One scored test instance: model output, ground truth and inspection cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredPrediction {
    /// Predicted probability of the positive class.
    pub probability: f64,
    pub actual: Label,
    /// Effort needed to inspect the instance (e.g. lines of code).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<f64>,
}

impl ScoredPrediction {
    pub fn new(probability: f64, actual: Label) -> Self {
        Self {
            probability,
            actual,
            effort: None,
        }
    }

    pub fn with_effort(mut self, effort: f64) -> Self {
        self.effort = Some(effort);
        self
    }

    pub fn predicted(&self) -> Label {
        Label::from_probability(self.probability)
    }
}
