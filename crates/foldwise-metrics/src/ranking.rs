//! Effort-aware ranking metric (NPofB).
//!
//! An analyst inspects instances in descending order of predicted defect
//! probability. NPofB answers "what fraction of the defective instances are
//! found within the first X% of the inspection budget", normalised by X so
//! that 1.0 means defects are found exactly in proportion to the budget spent.
//!
//! Two definitions of the budget circulate in the literature and both are
//! supported; the caller always picks one through [`RankingMode`]:
//!
//! - [`RankingMode::EffortWeighted`]: budget is X% of the summed effort
//!   attribute (e.g. lines of code).
//! - [`RankingMode::InstanceCount`]: budget is the top `ceil(n·X/100)`
//!   instances.
//!
//! Ties in probability keep their original test-set order (stable sort).

use crate::error::{MetricsError, MetricsResult};
use crate::prediction::ScoredPrediction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Budget percentage used for the reported NPofB20 metric.
pub const NPOFB_CUTOFF_PERCENT: f64 = 20.0;

/// How the inspection budget is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankingMode {
    /// Cut off at X% of cumulative effort.
    #[default]
    #[serde(rename = "effort", alias = "effort_weighted")]
    EffortWeighted,
    /// Cut off at the top X% of instances.
    #[serde(rename = "count", alias = "instance_count")]
    InstanceCount,
}

impl RankingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMode::EffortWeighted => "effort",
            RankingMode::InstanceCount => "count",
        }
    }

    pub fn requires_effort(&self) -> bool {
        matches!(self, RankingMode::EffortWeighted)
    }
}

impl fmt::Display for RankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingMode {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "effort" | "effort_weighted" => Ok(RankingMode::EffortWeighted),
            "count" | "instance_count" => Ok(RankingMode::InstanceCount),
            other => Err(MetricsError::UnknownRankingMode(other.to_string())),
        }
    }
}

/// Normalised percentage of positives found within `percent`% of the budget.
///
/// Returns 0 when the predictions contain no positive instance.
pub fn normalized_pofb(
    preds: &[ScoredPrediction],
    mode: RankingMode,
    percent: f64,
) -> MetricsResult<f64> {
    let total_positives = preds.iter().filter(|p| p.actual.is_positive()).count();
    if total_positives == 0 {
        return Ok(0.0);
    }

    let order = inspection_order(preds);
    let found = match mode {
        RankingMode::EffortWeighted => found_within_effort(preds, &order, percent)?,
        RankingMode::InstanceCount => found_within_count(preds, &order, percent),
    };

    let rate = found as f64 / total_positives as f64 * 100.0;
    Ok(rate / percent)
}

/// Indices sorted by descending probability; equal probabilities keep input order.
fn inspection_order(preds: &[ScoredPrediction]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..preds.len()).collect();
    order.sort_by(|&a, &b| preds[b].probability.total_cmp(&preds[a].probability));
    order
}

fn found_within_effort(
    preds: &[ScoredPrediction],
    order: &[usize],
    percent: f64,
) -> MetricsResult<usize> {
    let mut efforts = Vec::with_capacity(preds.len());
    for (index, p) in preds.iter().enumerate() {
        let value = p.effort.ok_or(MetricsError::MissingEffort { index })?;
        if !value.is_finite() || value < 0.0 {
            return Err(MetricsError::InvalidEffort { index, value });
        }
        efforts.push(value);
    }

    let total: f64 = efforts.iter().sum();
    let budget = percent / 100.0 * total;

    let mut spent = 0.0;
    let mut found = 0;
    for &i in order {
        if spent + efforts[i] > budget {
            break;
        }
        spent += efforts[i];
        if preds[i].actual.is_positive() {
            found += 1;
        }
    }
    Ok(found)
}

fn found_within_count(preds: &[ScoredPrediction], order: &[usize], percent: f64) -> usize {
    let cutoff = ((preds.len() as f64 * percent / 100.0).ceil() as usize).min(preds.len());
    order[..cutoff]
        .iter()
        .filter(|&&i| preds[i].actual.is_positive())
        .count()
}
