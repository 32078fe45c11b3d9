//! Metric calculators for binary defect classifiers.
//!
//! Everything in this crate is a pure function over a slice of
//! [`ScoredPrediction`]s collected from one test fold:
//!
//! - `confusion`: 2×2 confusion matrix and the threshold metrics
//!   (accuracy, precision, recall, F1, Cohen's kappa)
//! - `roc`: rank-based area under the ROC curve
//! - `ranking`: NPofB20, the effort-aware ranking metric, in both of its
//!   published variants ([`RankingMode`])
//! - `record`: the fixed [`Metrics`] record computed per fold
//!
//! ```
//! use foldwise_metrics::{Label, Metrics, RankingMode, ScoredPrediction};
//!
//! let preds = vec![
//!     ScoredPrediction::new(0.9, Label::Positive).with_effort(10.0),
//!     ScoredPrediction::new(0.2, Label::Negative).with_effort(40.0),
//! ];
//! let m = Metrics::from_predictions(&preds, RankingMode::EffortWeighted).unwrap();
//! assert_eq!(m.accuracy, 100.0);
//! ```

pub mod confusion;
pub mod error;
pub mod prediction;
pub mod ranking;
pub mod record;
pub mod roc;

pub use confusion::{ConfusionMatrix, DECISION_THRESHOLD};
pub use error::{MetricsError, MetricsResult};
pub use prediction::{Label, ScoredPrediction};
pub use ranking::{normalized_pofb, RankingMode, NPOFB_CUTOFF_PERCENT};
pub use record::Metrics;
pub use roc::area_under_roc;
