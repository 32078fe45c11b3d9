pub mod progress;
pub mod scheduler;

pub use progress::{ProgressEvent, ProgressSink};
pub use scheduler::Scheduler;

use crate::aggregate::{aggregate_model, AggregateResult};
use crate::config::CvConfig;
use crate::dataset::Dataset;
use crate::errors::{EvalError, EvalResult};
use crate::fold_task::{FoldTask, PerFoldResult};
use crate::model::Classifier;
use crate::split;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of evaluating one model on one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub dataset: String,
    pub model: String,
    /// Sorted by `(run, fold)`.
    pub per_fold: Vec<PerFoldResult>,
    pub aggregate: AggregateResult,
}

/// Repeated k-fold evaluation of untrained model prototypes.
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: CvConfig,
    scheduler: Scheduler,
}

impl Evaluator {
    pub fn new(config: CvConfig) -> EvalResult<Self> {
        config.validate()?;
        let scheduler = Scheduler::from_config(&config);
        Ok(Self { config, scheduler })
    }

    /// Called after every completed fold of every model.
    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.scheduler = self.scheduler.with_progress(sink);
        self
    }

    /// Evaluate `prototype` on `dataset`. The prototype itself is never trained;
    /// each fold works on its own clone. Any fold failure fails the call.
    pub async fn evaluate(
        &self,
        dataset: Arc<Dataset>,
        model: &str,
        prototype: Arc<dyn Classifier>,
    ) -> EvalResult<ModelReport> {
        let cfg = &self.config;
        if cfg.ranking_mode.requires_effort() && !dataset.has_effort() {
            return Err(EvalError::config(format!(
                "ranking mode '{}' needs an effort column but dataset '{}' has none",
                cfg.ranking_mode,
                dataset.name()
            )));
        }

        let splits = split::generate(&dataset, cfg.runs, cfg.folds, cfg.seed, cfg.stratify)?;
        tracing::info!(
            dataset = dataset.name(),
            model,
            runs = cfg.runs,
            folds = cfg.folds,
            seed = cfg.seed,
            ranking_mode = %cfg.ranking_mode,
            "evaluation started"
        );
        let started = Instant::now();

        let ranking_mode = cfg.ranking_mode;
        let mut per_fold = self
            .scheduler
            .evaluate(model, splits, |split| FoldTask {
                model: model.to_string(),
                dataset: Arc::clone(&dataset),
                split,
                prototype: Arc::clone(&prototype),
                ranking_mode,
            })
            .await?;
        per_fold.sort_by_key(|r| (r.run, r.fold));

        let aggregate = aggregate_model(model, &per_fold)?;
        tracing::info!(
            dataset = dataset.name(),
            model,
            folds = per_fold.len(),
            accuracy = aggregate.mean.accuracy,
            auc = aggregate.mean.auc,
            npofb20 = aggregate.mean.npofb20,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "evaluation finished"
        );

        Ok(ModelReport {
            dataset: dataset.name().to_string(),
            model: model.to_string(),
            per_fold,
            aggregate,
        })
    }
}
