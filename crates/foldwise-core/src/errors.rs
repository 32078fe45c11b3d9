//! Error types for the evaluation engine.

use foldwise_metrics::MetricsError;

/// Evaluation errors.
///
/// A single failed fold aborts the whole evaluation call: there is no variant
/// that carries partial results.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// Invalid runs/folds, dataset too small to stratify, unknown ranking mode, ...
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Dataset violates its schema or could not be parsed.
    #[error("dataset error: {message}")]
    Dataset { message: String },

    /// A model clone failed to train or predict.
    #[error("training failed for {model} (run {run}, fold {fold}): {message}")]
    Training {
        model: String,
        run: usize,
        fold: usize,
        message: String,
    },

    /// Fold predictions could not be turned into metrics.
    #[error("metrics failed for {model} (run {run}, fold {fold}): {source}")]
    FoldMetrics {
        model: String,
        run: usize,
        fold: usize,
        #[source]
        source: MetricsError,
    },

    /// Reading the completion queue failed.
    #[error(transparent)]
    ResultCollection(#[from] ResultCollectionError),

    /// Aggregation was asked to average zero results.
    #[error("no fold results for model {model}")]
    EmptyResultSet { model: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while draining the scheduler's completion queue.
#[derive(Debug, thiserror::Error)]
pub enum ResultCollectionError {
    /// The fold task panicked or was aborted before producing a result.
    #[error("fold task for {model} did not complete: {reason}")]
    TaskAborted { model: String, reason: String },

    /// The pool yielded fewer results than splits submitted. Indicates a bug.
    #[error("worker pool produced {got} of {expected} results for {model}")]
    MissingResults {
        model: String,
        expected: usize,
        got: usize,
    },

    /// Two results claimed the same (run, fold). Indicates a bug.
    #[error("duplicate result for {model} run {run} fold {fold}")]
    Duplicate {
        model: String,
        run: usize,
        fold: usize,
    },

    /// Wait ceiling elapsed under `TimeoutPolicy::Fail`.
    #[error(
        "wait ceiling of {ceiling_secs}s exceeded for {model}: {collected}/{expected} results collected"
    )]
    DeadlineExceeded {
        model: String,
        ceiling_secs: u64,
        collected: usize,
        expected: usize,
    },

    /// The worker pool stopped handing out slots.
    #[error("worker pool closed: {0}")]
    PoolClosed(String),
}

impl EvalError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn dataset(message: impl Into<String>) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Caller supplied something unusable
            Self::Configuration { .. } => 2,
            Self::Dataset { .. } => 2,

            // Evaluation itself broke down
            Self::Training { .. } => 3,
            Self::FoldMetrics { .. } => 3,
            Self::ResultCollection(_) => 3,
            Self::EmptyResultSet { .. } => 3,

            // Reading inputs / writing reports
            Self::Io(_) => 1,
            Self::Csv(_) => 1,
            Self::Json(_) => 1,
        }
    }

    /// Stable machine-readable kind, used in summaries and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Dataset { .. } => "dataset",
            Self::Training { .. } => "training",
            Self::FoldMetrics { .. } => "fold_metrics",
            Self::ResultCollection(_) => "result_collection",
            Self::EmptyResultSet { .. } => "empty_result_set",
            Self::Io(_) => "io",
            Self::Csv(_) => "csv",
            Self::Json(_) => "json",
        }
    }
}

/// Result type for engine operations.
pub type EvalResult<T> = Result<T, EvalError>;
