use foldwise_core::{
    Classifier, CvConfig, Dataset, EvalError, Evaluator, Instance, Label, ModelParams,
    ModelRegistry, RankingMode,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// 100 instances, 25 defective; defective modules are larger and more complex.
fn defects(with_effort: bool) -> Arc<Dataset> {
    let rows = (0..100)
        .map(|i| {
            let defective = i % 4 == 0;
            let loc = if defective { 200.0 + i as f64 } else { 20.0 + (i % 13) as f64 };
            let wmc = if defective { 12.0 + (i % 5) as f64 } else { 2.0 + (i % 7) as f64 };
            let label = if defective { Label::Positive } else { Label::Negative };
            let inst = Instance::new(vec![loc, wmc], label);
            if with_effort {
                inst.with_effort(loc)
            } else {
                inst
            }
        })
        .collect();
    let effort = with_effort.then(|| "loc".to_string());
    Arc::new(Dataset::new("synthetic", vec!["loc".into(), "wmc".into()], effort, rows).unwrap())
}

fn cv() -> CvConfig {
    CvConfig {
        runs: 2,
        folds: 5,
        seed: 11,
        workers: Some(4),
        ..CvConfig::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_runs_five_folds_cover_every_split_once() {
    let registry = ModelRegistry::with_builtins();
    let evaluator = Evaluator::new(cv()).unwrap();

    for id in ["naive_bayes", "knn"] {
        let prototype = registry.create(id, &ModelParams::new()).unwrap();
        let report = evaluator
            .evaluate(defects(true), id, Arc::from(prototype))
            .await
            .unwrap();

        assert_eq!(report.per_fold.len(), 10);
        let keys: BTreeSet<(usize, usize)> =
            report.per_fold.iter().map(|r| (r.run, r.fold)).collect();
        let expected: BTreeSet<(usize, usize)> =
            (0..2).flat_map(|r| (0..5).map(move |f| (r, f))).collect();
        assert_eq!(keys, expected);

        for r in &report.per_fold {
            assert!((0.0..=100.0).contains(&r.metrics.accuracy));
            assert!(r.metrics.is_finite());
        }

        let mean_acc: f64 =
            report.per_fold.iter().map(|r| r.metrics.accuracy).sum::<f64>() / 10.0;
        assert!((report.aggregate.mean.accuracy - mean_acc).abs() < 1e-9);
        assert_eq!(report.aggregate.folds, 10);
        // Cleanly separable data.
        assert!(report.aggregate.mean.accuracy > 90.0, "{id}: {:?}", report.aggregate);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn same_seed_same_fold_metrics() {
    let registry = ModelRegistry::with_builtins();
    let evaluator = Evaluator::new(cv()).unwrap();
    let proto = || -> Arc<dyn Classifier> {
        Arc::from(registry.create("knn", &ModelParams::new().with("k", 3)).unwrap())
    };

    let a = evaluator.evaluate(defects(true), "knn", proto()).await.unwrap();
    let b = evaluator.evaluate(defects(true), "knn", proto()).await.unwrap();
    assert_eq!(a.per_fold, b.per_fold);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn effort_ranking_needs_effort_column() {
    let registry = ModelRegistry::with_builtins();
    let evaluator = Evaluator::new(cv()).unwrap();
    let prototype = registry.create("naive_bayes", &ModelParams::new()).unwrap();

    let err = evaluator
        .evaluate(defects(false), "naive_bayes", Arc::from(prototype))
        .await
        .unwrap_err();
    assert!(matches!(err, EvalError::Configuration { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn count_ranking_works_without_effort() {
    let registry = ModelRegistry::with_builtins();
    let evaluator = Evaluator::new(CvConfig {
        ranking_mode: RankingMode::InstanceCount,
        ..cv()
    })
    .unwrap();
    let prototype = registry.create("naive_bayes", &ModelParams::new()).unwrap();

    let report = evaluator
        .evaluate(defects(false), "naive_bayes", Arc::from(prototype))
        .await
        .unwrap();
    // 5 positives per 20-instance fold, cutoff 4: at most 4/5 found, i.e. 4.0.
    assert!(report.aggregate.mean.npofb20 <= 4.0 + 1e-9);
    assert!(report.aggregate.mean.npofb20 > 0.0);
}

#[test]
fn invalid_cv_config_rejected_up_front() {
    let err = Evaluator::new(CvConfig {
        folds: 1,
        ..CvConfig::default()
    })
    .unwrap_err();
    assert!(matches!(err, EvalError::Configuration { .. }));
}
