//! Equal-weight averaging of per-fold metrics.

use crate::errors::{EvalError, EvalResult};
use crate::fold_task::PerFoldResult;
use foldwise_metrics::Metrics;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub model: String,
    /// Number of fold results averaged.
    pub folds: usize,
    pub mean: Metrics,
    /// Sample standard deviation per field; zero for a single fold.
    pub std_dev: Metrics,
}

/// Aggregate every model present in `results`, sorted by model name.
pub fn aggregate(results: &[PerFoldResult]) -> EvalResult<Vec<AggregateResult>> {
    let mut groups: BTreeMap<&str, Vec<&Metrics>> = BTreeMap::new();
    for r in results {
        groups.entry(r.model.as_str()).or_default().push(&r.metrics);
    }
    groups
        .into_iter()
        .map(|(model, metrics)| summarize(model, &metrics))
        .collect()
}

/// Aggregate the results belonging to `model`.
pub fn aggregate_model(model: &str, results: &[PerFoldResult]) -> EvalResult<AggregateResult> {
    let metrics: Vec<&Metrics> = results
        .iter()
        .filter(|r| r.model == model)
        .map(|r| &r.metrics)
        .collect();
    summarize(model, &metrics)
}

fn summarize(model: &str, metrics: &[&Metrics]) -> EvalResult<AggregateResult> {
    if metrics.is_empty() {
        return Err(EvalError::EmptyResultSet {
            model: model.to_string(),
        });
    }
    let n = metrics.len() as f64;
    let sum = metrics
        .iter()
        .fold(Metrics::default(), |acc, m| acc.zip_with(m, |a, b| a + b));
    let mean = sum.map(|s| s / n);

    let std_dev = if metrics.len() < 2 {
        Metrics::default()
    } else {
        let dev = metrics.iter().fold(Metrics::default(), |acc, m| {
            let d = m.zip_with(&mean, |x, mu| x - mu);
            acc.zip_with(&d, |a, b| a + b * b)
        });
        dev.map(|v| (v / (n - 1.0)).sqrt())
    };

    Ok(AggregateResult {
        model: model.to_string(),
        folds: metrics.len(),
        mean,
        std_dev,
    })
}
