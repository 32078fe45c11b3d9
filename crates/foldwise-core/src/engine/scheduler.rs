use crate::config::{CvConfig, TimeoutPolicy};
use crate::engine::progress::{ProgressEvent, ProgressSink};
use crate::errors::{EvalResult, ResultCollectionError};
use crate::fold_task::{FoldTask, PerFoldResult};
use crate::split::Split;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{timeout_at, Instant};

/// Bounded worker pool for fold tasks, scoped to a single `evaluate` call.
#[derive(Clone)]
pub struct Scheduler {
    workers: usize,
    wait_ceiling: Duration,
    timeout_policy: TimeoutPolicy,
    progress: Option<ProgressSink>,
}

impl Scheduler {
    pub fn new(workers: usize, wait_ceiling: Duration, timeout_policy: TimeoutPolicy) -> Self {
        Self {
            workers: workers.max(1),
            wait_ceiling,
            timeout_policy,
            progress: None,
        }
    }

    pub fn from_config(cfg: &CvConfig) -> Self {
        Self::new(cfg.worker_count(), cfg.wait_ceiling(), cfg.timeout_policy)
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run one fold task per split and return exactly one result per split,
    /// in completion order.
    ///
    /// The first failing task ends the call. Dropping the `JoinSet` on return
    /// cancels folds that have not started; folds already running on the
    /// blocking pool finish detached and their results are discarded.
    pub async fn evaluate<F>(
        &self,
        model: &str,
        splits: Vec<Split>,
        make_task: F,
    ) -> EvalResult<Vec<PerFoldResult>>
    where
        F: Fn(Split) -> FoldTask,
    {
        let expected = splits.len();
        let sem = Arc::new(Semaphore::new(self.workers));
        let mut join_set = JoinSet::new();
        let mut collector = Collector::new(model, expected, self.progress.as_ref());

        tracing::info!(model, folds = expected, workers = self.workers, "submitting fold tasks");

        // One ceiling for the whole batch, queued folds included.
        let deadline = Instant::now() + self.wait_ceiling;
        let mut ceiling_passed = false;

        for split in splits {
            let acquired = if ceiling_passed {
                sem.clone().acquire_owned().await
            } else {
                match timeout_at(deadline, sem.clone().acquire_owned()).await {
                    Ok(acquired) => acquired,
                    Err(_) => {
                        ceiling_passed = true;
                        self.ceiling_elapsed(model, collector.results.len(), expected)?;
                        sem.clone().acquire_owned().await
                    }
                }
            };
            let permit =
                acquired.map_err(|e| ResultCollectionError::PoolClosed(e.to_string()))?;
            let task = make_task(split);
            join_set.spawn_blocking(move || {
                let _permit = permit;
                task.run()
            });
            // Surface failures while still submitting.
            while let Some(res) = join_set.try_join_next() {
                collector.accept(res)?;
            }
        }

        loop {
            let next = if ceiling_passed {
                join_set.join_next().await
            } else {
                match timeout_at(deadline, join_set.join_next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        ceiling_passed = true;
                        self.ceiling_elapsed(model, collector.results.len(), expected)?;
                        continue;
                    }
                }
            };
            match next {
                Some(res) => collector.accept(res)?,
                None => break,
            }
        }

        collector.finish()
    }

    /// Warn once the ceiling passes; under `Fail` the call ends here.
    fn ceiling_elapsed(&self, model: &str, collected: usize, expected: usize) -> EvalResult<()> {
        tracing::warn!(
            model,
            ceiling_secs = self.wait_ceiling.as_secs_f64(),
            collected,
            expected,
            policy = ?self.timeout_policy,
            "wait ceiling elapsed; running folds are not interrupted"
        );
        match self.timeout_policy {
            TimeoutPolicy::KeepWaiting => Ok(()),
            TimeoutPolicy::Fail => Err(ResultCollectionError::DeadlineExceeded {
                model: model.to_string(),
                ceiling_secs: self.wait_ceiling.as_secs(),
                collected,
                expected,
            }
            .into()),
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("workers", &self.workers)
            .field("wait_ceiling", &self.wait_ceiling)
            .field("timeout_policy", &self.timeout_policy)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

struct Collector<'a> {
    model: &'a str,
    expected: usize,
    seen: HashSet<(usize, usize)>,
    results: Vec<PerFoldResult>,
    progress: Option<&'a ProgressSink>,
}

impl<'a> Collector<'a> {
    fn new(model: &'a str, expected: usize, progress: Option<&'a ProgressSink>) -> Self {
        Self {
            model,
            expected,
            seen: HashSet::with_capacity(expected),
            results: Vec::with_capacity(expected),
            progress,
        }
    }

    fn accept(&mut self, res: Result<EvalResult<PerFoldResult>, JoinError>) -> EvalResult<()> {
        let result = match res {
            Ok(Ok(r)) => r,
            Ok(Err(e)) => return Err(e),
            Err(e) => {
                return Err(ResultCollectionError::TaskAborted {
                    model: self.model.to_string(),
                    reason: e.to_string(),
                }
                .into())
            }
        };
        if !self.seen.insert((result.run, result.fold)) {
            return Err(ResultCollectionError::Duplicate {
                model: self.model.to_string(),
                run: result.run,
                fold: result.fold,
            }
            .into());
        }
        self.results.push(result);
        if let Some(sink) = self.progress {
            sink(ProgressEvent {
                done: self.results.len(),
                total: self.expected,
            });
        }
        Ok(())
    }

    fn finish(self) -> EvalResult<Vec<PerFoldResult>> {
        if self.results.len() != self.expected {
            return Err(ResultCollectionError::MissingResults {
                model: self.model.to_string(),
                expected: self.expected,
                got: self.results.len(),
            }
            .into());
        }
        Ok(self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EvalError;
    use foldwise_metrics::Metrics;

    fn result(run: usize, fold: usize) -> PerFoldResult {
        PerFoldResult {
            model: "m".into(),
            run,
            fold,
            metrics: Metrics::default(),
        }
    }

    #[test]
    fn collector_rejects_duplicates() {
        let mut c = Collector::new("m", 2, None);
        c.accept(Ok(Ok(result(0, 1)))).unwrap();
        let err = c.accept(Ok(Ok(result(0, 1)))).unwrap_err();
        assert!(matches!(
            err,
            EvalError::ResultCollection(ResultCollectionError::Duplicate { run: 0, fold: 1, .. })
        ));
    }

    #[test]
    fn collector_detects_missing_results() {
        let mut c = Collector::new("m", 3, None);
        c.accept(Ok(Ok(result(0, 0)))).unwrap();
        let err = c.finish().unwrap_err();
        assert!(matches!(
            err,
            EvalError::ResultCollection(ResultCollectionError::MissingResults {
                expected: 3,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn collector_reports_progress() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink: ProgressSink = {
            let seen = seen.clone();
            Arc::new(move |e: ProgressEvent| seen.lock().unwrap().push(e.done))
        };
        let mut c = Collector::new("m", 2, Some(&sink));
        c.accept(Ok(Ok(result(0, 0)))).unwrap();
        c.accept(Ok(Ok(result(0, 1)))).unwrap();
        assert_eq!(c.finish().unwrap().len(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn workers_never_zero() {
        let s = Scheduler::new(0, Duration::from_secs(1), TimeoutPolicy::Fail);
        assert_eq!(s.workers(), 1);
    }
}
