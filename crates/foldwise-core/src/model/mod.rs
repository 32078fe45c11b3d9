//! Model capability used by the engine.
//!
//! The engine never knows which algorithm it is evaluating: it holds an
//! untrained prototype behind [`Classifier`], clones it once per fold, trains
//! the clone and asks it for class distributions. New model kinds plug in by
//! registering a [`ModelProvider`] with the [`ModelRegistry`].

pub mod knn;
pub mod naive_bayes;
pub mod registry;

pub use registry::{ModelProvider, ModelRegistry};

use crate::dataset::TrainingSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A trainable binary classifier.
pub trait Classifier: Send + Sync {
    /// Fit on the given training rows. Called once, on a fresh clone.
    fn train(&mut self, data: &TrainingSet<'_>) -> anyhow::Result<()>;

    /// Class distribution for one feature vector.
    fn distribution(&self, features: &[f64]) -> anyhow::Result<ClassDistribution>;

    /// Independent copy in the same (untrained) state.
    fn boxed_clone(&self) -> Box<dyn Classifier>;
}

/// Probabilities for (negative, positive), summing to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDistribution {
    negative: f64,
    positive: f64,
}

impl ClassDistribution {
    /// Normalise non-negative weights. All-zero weights give an even split.
    pub fn from_weights(negative: f64, positive: f64) -> Self {
        let total = negative + positive;
        if total > 0.0 && total.is_finite() {
            Self {
                negative: negative / total,
                positive: positive / total,
            }
        } else {
            Self {
                negative: 0.5,
                positive: 0.5,
            }
        }
    }

    pub fn positive(&self) -> f64 {
        self.positive
    }

    pub fn negative(&self) -> f64 {
        self.negative
    }
}

/// Free-form provider parameters as written in the run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelParams(BTreeMap<String, serde_json::Value>);

impl ModelParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get_usize(&self, key: &str, default: usize) -> anyhow::Result<usize> {
        match self.0.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| anyhow::anyhow!("parameter '{key}' must be a non-negative integer, got {v}")),
        }
    }

    pub fn get_f64(&self, key: &str, default: f64) -> anyhow::Result<f64> {
        match self.0.get(key) {
            None => Ok(default),
            Some(v) => v
                .as_f64()
                .ok_or_else(|| anyhow::anyhow!("parameter '{key}' must be a number, got {v}")),
        }
    }

    /// Reject keys a provider does not understand.
    pub fn ensure_only(&self, allowed: &[&str]) -> anyhow::Result<()> {
        if let Some(key) = self.0.keys().find(|k| !allowed.contains(&k.as_str())) {
            anyhow::bail!(
                "unknown parameter '{key}' (expected one of: {})",
                if allowed.is_empty() {
                    "<none>".to_string()
                } else {
                    allowed.join(", ")
                }
            );
        }
        Ok(())
    }
}
