//! One unit of parallel work: train a fresh model clone on a split and score it.

use crate::dataset::Dataset;
use crate::errors::{EvalError, EvalResult};
use crate::model::Classifier;
use crate::split::Split;
use foldwise_metrics::{Metrics, RankingMode, ScoredPrediction};
use serde::Serialize;
use std::sync::Arc;
use sysinfo::System;

/// Metrics of one model on one `(run, fold)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerFoldResult {
    pub model: String,
    pub run: usize,
    pub fold: usize,
    pub metrics: Metrics,
}

/// Everything a worker needs; owns no mutable shared state.
pub struct FoldTask {
    pub model: String,
    pub dataset: Arc<Dataset>,
    pub split: Split,
    pub prototype: Arc<dyn Classifier>,
    pub ranking_mode: RankingMode,
}

impl FoldTask {
    pub fn run(self) -> EvalResult<PerFoldResult> {
        let Split {
            run,
            fold,
            ref train,
            ref test,
        } = self.split;

        let predictions = match self.score(train, test) {
            Ok(p) => p,
            Err(e) => {
                log_memory(&self.model, run, fold);
                return Err(EvalError::Training {
                    model: self.model,
                    run,
                    fold,
                    message: format!("{e:#}"),
                });
            }
        };

        let metrics = Metrics::from_predictions(&predictions, self.ranking_mode).map_err(|source| {
            EvalError::FoldMetrics {
                model: self.model.clone(),
                run,
                fold,
                source,
            }
        })?;

        tracing::debug!(model = %self.model, run, fold, test = test.len(), "fold scored");
        Ok(PerFoldResult {
            model: self.model,
            run,
            fold,
            metrics,
        })
    }

    fn score(&self, train: &[usize], test: &[usize]) -> anyhow::Result<Vec<ScoredPrediction>> {
        let mut model = self.prototype.boxed_clone();
        model.train(&self.dataset.view(train))?;

        test.iter()
            .map(|&i| {
                let inst = self.dataset.instance(i);
                let dist = model.distribution(&inst.features)?;
                let mut p = ScoredPrediction::new(dist.positive(), inst.label);
                p.effort = inst.effort;
                Ok(p)
            })
            .collect()
    }
}

fn log_memory(model: &str, run: usize, fold: usize) {
    let mut sys = System::new();
    sys.refresh_memory();
    const MB: u64 = 1024 * 1024;
    tracing::error!(
        model,
        run,
        fold,
        free_mb = sys.free_memory() / MB,
        available_mb = sys.available_memory() / MB,
        total_mb = sys.total_memory() / MB,
        "fold failed; memory at failure"
    );
}
