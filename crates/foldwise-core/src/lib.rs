//! Repeated stratified k-fold evaluation engine for defect classifiers.
//!
//! - `split`: deterministic (run, fold) train/test partitions
//! - `engine`: bounded worker pool running one [`FoldTask`] per split, and the
//!   [`Evaluator`] that ties splitting, scheduling and aggregation together
//! - `model`: the [`Classifier`] capability, the provider registry and two
//!   reference models (Gaussian naive Bayes, kNN)
//! - `aggregate`: equal-weight means over fold results
//! - `config`, `loader`, `report`: YAML run configuration, CSV datasets, CSV
//!   and JSON result files
//!
//! # Quick Start
//!
//! ```no_run
//! use foldwise_core::{CvConfig, Evaluator, ModelParams, ModelRegistry};
//! use foldwise_core::config::DatasetSpec;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let dataset = foldwise_core::loader::load_csv(&DatasetSpec {
//!     path: "data/ant-1.7.csv".into(),
//!     name: None,
//!     class_column: Some("defective".into()),
//!     positive_label: "yes".into(),
//!     effort_column: Some("loc".into()),
//! })?;
//! let prototype = ModelRegistry::with_builtins().create("naive_bayes", &ModelParams::new())?;
//!
//! let evaluator = Evaluator::new(CvConfig::default())?;
//! let report = evaluator
//!     .evaluate(Arc::new(dataset), "naive_bayes", Arc::from(prototype))
//!     .await?;
//! println!("NPofB20 = {:.3}", report.aggregate.mean.npofb20);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod fingerprint;
pub mod fold_task;
pub mod loader;
pub mod model;
pub mod report;
pub mod split;

pub use aggregate::{aggregate, aggregate_model, AggregateResult};
pub use config::{CvConfig, RunConfig, TimeoutPolicy};
pub use dataset::{ClassCounts, Dataset, Instance, TrainingSet};
pub use engine::{Evaluator, ModelReport, ProgressEvent, ProgressSink, Scheduler};
pub use errors::{EvalError, EvalResult, ResultCollectionError};
pub use fold_task::{FoldTask, PerFoldResult};
pub use model::{ClassDistribution, Classifier, ModelParams, ModelProvider, ModelRegistry};
pub use split::Split;

pub use foldwise_metrics::{Label, Metrics, RankingMode, ScoredPrediction};
