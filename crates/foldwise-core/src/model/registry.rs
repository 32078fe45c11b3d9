use super::knn::KnnProvider;
use super::naive_bayes::NaiveBayesProvider;
use super::{Classifier, ModelParams};
use crate::errors::{EvalError, EvalResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds untrained classifiers of one kind from parameters.
pub trait ModelProvider: Send + Sync {
    /// Identifier used in run configurations (e.g. `knn`).
    fn id(&self) -> &'static str;

    fn create(&self, params: &ModelParams) -> anyhow::Result<Box<dyn Classifier>>;
}

#[derive(Clone, Default)]
pub struct ModelRegistry {
    providers: BTreeMap<String, Arc<dyn ModelProvider>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `naive_bayes` and `knn`.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register(Arc::new(NaiveBayesProvider));
        reg.register(Arc::new(KnnProvider));
        reg
    }

    /// Register a provider, replacing any provider with the same id.
    pub fn register(&mut self, provider: Arc<dyn ModelProvider>) {
        self.providers.insert(provider.id().to_string(), provider);
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Create an untrained prototype.
    pub fn create(&self, id: &str, params: &ModelParams) -> EvalResult<Box<dyn Classifier>> {
        let provider = self.providers.get(id).ok_or_else(|| {
            EvalError::config(format!(
                "unknown model provider '{id}' (available: {})",
                self.ids().collect::<Vec<_>>().join(", ")
            ))
        })?;
        provider
            .create(params)
            .map_err(|e| EvalError::config(format!("model provider '{id}': {e:#}")))
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
