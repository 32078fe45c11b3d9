use crate::errors::{EvalError, EvalResult};
use crate::model::{ModelParams, ModelRegistry};
use foldwise_metrics::RankingMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// What the scheduler does once the wait ceiling has elapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Log a warning and keep blocking until every fold reports.
    #[default]
    KeepWaiting,
    /// Log a warning and return `DeadlineExceeded`.
    Fail,
}

/// Cross-validation parameters for one evaluation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CvConfig {
    pub runs: usize,
    pub folds: usize,
    pub seed: u64,
    pub stratify: bool,
    pub ranking_mode: RankingMode,
    /// Worker pool size; defaults to the available hardware parallelism.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    pub wait_ceiling_secs: u64,
    pub timeout_policy: TimeoutPolicy,
}

impl Default for CvConfig {
    fn default() -> Self {
        Self {
            runs: 10,
            folds: 10,
            seed: 0,
            stratify: true,
            ranking_mode: RankingMode::default(),
            workers: None,
            wait_ceiling_secs: 600,
            timeout_policy: TimeoutPolicy::default(),
        }
    }
}

impl CvConfig {
    pub fn validate(&self) -> EvalResult<()> {
        if self.runs < 1 {
            return Err(EvalError::config("cv.runs must be >= 1"));
        }
        if self.folds < 2 {
            return Err(EvalError::config(format!(
                "cv.folds must be >= 2, got {}",
                self.folds
            )));
        }
        if self.wait_ceiling_secs == 0 {
            return Err(EvalError::config("cv.wait_ceiling_secs must be > 0"));
        }
        if self.workers == Some(0) {
            return Err(EvalError::config("cv.workers must be >= 1"));
        }
        Ok(())
    }

    pub fn wait_ceiling(&self) -> Duration {
        Duration::from_secs(self.wait_ceiling_secs)
    }

    /// Configured pool size, or the number of available cores.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSpec {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Defaults to the last column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_column: Option<String>,
    /// Class value treated as defective.
    pub positive_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort_column: Option<String>,
}

impl DatasetSpec {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "ModelParams::is_empty")]
    pub params: ModelParams,
}

impl ModelSpec {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.provider)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Append to existing CSV reports instead of truncating them.
    pub append: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
            append: false,
        }
    }
}

/// Top-level `foldwise.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub version: u32,
    #[serde(default)]
    pub cv: CvConfig,
    pub datasets: Vec<DatasetSpec>,
    pub models: Vec<ModelSpec>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RunConfig {
    /// Structural checks plus a dry instantiation of every model.
    pub fn validate(&self, registry: &ModelRegistry) -> EvalResult<()> {
        self.cv.validate()?;
        if self.datasets.is_empty() {
            return Err(EvalError::config("config has no datasets"));
        }
        if self.models.is_empty() {
            return Err(EvalError::config("config has no models"));
        }

        let mut seen = BTreeSet::new();
        for d in &self.datasets {
            if !seen.insert(d.display_name()) {
                return Err(EvalError::config(format!(
                    "duplicate dataset name '{}'",
                    d.display_name()
                )));
            }
        }
        let mut seen = BTreeSet::new();
        for m in &self.models {
            if !seen.insert(m.display_name()) {
                return Err(EvalError::config(format!(
                    "duplicate model name '{}'",
                    m.display_name()
                )));
            }
            registry.create(&m.provider, &m.params)?;
        }
        Ok(())
    }

    /// Resolve relative dataset and output paths against `base`.
    fn resolve_paths(&mut self, base: &Path) {
        for d in &mut self.datasets {
            if d.path.is_relative() {
                d.path = base.join(&d.path);
            }
        }
        if self.output.dir.is_relative() {
            self.output.dir = base.join(&self.output.dir);
        }
    }
}

/// Read and parse a run configuration. Relative paths inside the file are
/// taken relative to the file's directory.
pub fn load_config(path: &Path) -> EvalResult<RunConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        EvalError::config(format!("failed to read config {}: {}", path.display(), e))
    })?;
    let mut cfg: RunConfig = serde_yaml::from_str(&raw)
        .map_err(|e| EvalError::config(format!("failed to parse YAML: {}", e)))?;
    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(EvalError::config(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }
    if let Some(base) = path.parent() {
        cfg.resolve_paths(base);
    }
    cfg.cv.validate()?;
    Ok(cfg)
}

pub fn write_sample_config(path: &Path) -> EvalResult<()> {
    std::fs::write(path, include_str!("../../../foldwise.yaml"))?;
    Ok(())
}
