//! Error types for metric computation.

/// Metric errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    /// Effort-weighted ranking needs an effort value on every prediction.
    #[error("prediction {index} has no effort value (effort-weighted ranking requires one)")]
    MissingEffort { index: usize },

    /// Effort values must be finite and non-negative.
    #[error("prediction {index} has invalid effort {value}")]
    InvalidEffort { index: usize, value: f64 },

    /// Ranking mode string did not name a known variant.
    #[error("unknown ranking mode '{0}' (expected 'effort' or 'count')")]
    UnknownRankingMode(String),
}

/// Result type for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;
